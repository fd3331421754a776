//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the binary's own crate and the shared
/// engine log at `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    init(bin_name, default_level, false);
}

/// Same as [`setup_logger`] but writes to stderr, leaving stdout to the
/// chat transcript.
pub fn setup_stderr_logger(bin_name: &str, default_level: &str) {
    init(bin_name, default_level, true);
}

fn init(bin_name: &str, default_level: &str, stderr: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = if stderr {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Logger already initialised: {e}");
    }
}

fn default_directive(bin_name: &str, default_level: &str) -> String {
    let crate_name = bin_name.replace('-', "_");
    format!("{crate_name}={default_level},linechat_shared={default_level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_crate_names() {
        // テスト項目: バイナリ名からクレート名のフィルタが組み立てられる
        // when (操作):
        let directive = default_directive("linechat-server", "debug");

        // then (期待する結果):
        assert_eq!(directive, "linechat_server=debug,linechat_shared=debug");
    }
}
