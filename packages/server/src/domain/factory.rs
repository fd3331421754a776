//! Domain factories for creating domain entities and value objects.

use super::Nickname;

/// Factory for generating guest nicknames.
///
/// Each server session owns one factory, so numbering starts at `Guest1`
/// for every session and a number is never handed out twice within it.
#[derive(Debug)]
pub struct GuestNameFactory {
    next: u64,
}

impl GuestNameFactory {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Generate the next guest nickname.
    pub fn generate(&mut self) -> Nickname {
        let name = Nickname::guest(self.next);
        self.next += 1;
        name
    }
}

impl Default for GuestNameFactory {
    fn default() -> Self {
        Self::new()
    }
}
