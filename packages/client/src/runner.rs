//! Client entry point: reactor loop plus terminal input thread.

use std::{
    io,
    ops::ControlFlow,
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender, TryRecvError},
    },
};

use linechat_shared::{
    ConnectionState, Interests, MioReactor, Notification, Readiness, ReadinessSource, SocketId,
    time::now_millis,
};
use mio::{Waker, net::TcpStream};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::oneshot;

use crate::{
    config::ClientConfig,
    connector::{self, ConnectStatus},
    display,
    error::ClientError,
    input::{HELP, UserCommand},
    session::{ClientSession, REASON_DISCONNECTED, REASON_SOCKET_ERROR},
};

/// Run the interactive client until `/quit`, Ctrl+C or Ctrl+D.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let reactor = MioReactor::new(config.event_capacity)?;
    let (commands_tx, commands_rx) = mpsc::channel();
    spawn_input(commands_tx, reactor.waker()).await?;

    let client = ClientLoop::new(config, reactor, commands_rx);
    tokio::task::spawn_blocking(move || client.run()).await?
}

/// Start the terminal input thread once its editor is ready.
///
/// The thread blocks on the terminal and is never joined, so a reactor
/// that has already stopped does not wait for the next keystroke.
async fn spawn_input(commands: Sender<UserCommand>, waker: Arc<Waker>) -> Result<(), ClientError> {
    let (ready_tx, ready_rx) = oneshot::channel();
    std::thread::spawn(move || match DefaultEditor::new() {
        Ok(editor) => {
            let _ = ready_tx.send(Ok(()));
            read_input(editor, commands, waker);
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    });

    match ready_rx.await {
        Ok(result) => Ok(result?),
        Err(_) => Err(io::Error::other("terminal input thread exited").into()),
    }
}

fn read_input(mut editor: DefaultEditor, commands: Sender<UserCommand>, waker: Arc<Waker>) {
    loop {
        let command = match editor.readline("> ") {
            Ok(line) => {
                if let Err(e) = editor.add_history_entry(line.as_str()) {
                    tracing::debug!("Failed to record history: {}", e);
                }
                UserCommand::parse(&line)
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => UserCommand::Quit,
            Err(e) => {
                tracing::error!("Terminal input failed: {}", e);
                UserCommand::Quit
            }
        };
        let quit = command == UserCommand::Quit;
        if commands.send(command).is_err() {
            break;
        }
        if let Err(e) = waker.wake() {
            tracing::error!("Failed to wake the reactor: {}", e);
            break;
        }
        if quit {
            break;
        }
    }
}

/// Everything the reactor thread owns.
struct ClientLoop {
    config: ClientConfig,
    reactor: MioReactor,
    session: ClientSession<TcpStream>,
    commands: Receiver<UserCommand>,
    next_id: usize,
}

impl ClientLoop {
    fn new(config: ClientConfig, reactor: MioReactor, commands: Receiver<UserCommand>) -> Self {
        let session = ClientSession::new(config.nickname.clone(), config.max_line_length);
        Self {
            config,
            reactor,
            session,
            commands,
            next_id: 1,
        }
    }

    fn run(mut self) -> Result<(), ClientError> {
        if self.config.auto_connect {
            self.connect();
        } else {
            self.print_notice("Type /connect to connect, /help for commands.");
        }
        self.flush();

        let mut notifications = Vec::with_capacity(self.config.event_capacity);
        loop {
            notifications.clear();
            self.reactor.wait(&mut notifications, None)?;
            for notification in notifications.drain(..) {
                let flow = self.dispatch(notification);
                self.flush();
                if flow.is_break() {
                    self.shutdown();
                    return Ok(());
                }
            }
        }
    }

    fn dispatch(&mut self, notification: Notification) -> ControlFlow<()> {
        let Notification { socket, readiness } = notification;
        if readiness == Readiness::Wake {
            return self.handle_input();
        }
        if self.session.socket_id() != Some(socket) {
            tracing::trace!("Dropping {:?} for stale {}", readiness, socket);
            return ControlFlow::Continue(());
        }

        match readiness {
            Readiness::ConnectComplete => self.on_connect_complete(),
            Readiness::Readable => self.session.on_readable(),
            Readiness::Closed => self.on_hangup(REASON_DISCONNECTED),
            Readiness::Error => self.on_hangup(REASON_SOCKET_ERROR),
            Readiness::Incoming | Readiness::Wake => {}
        }
        ControlFlow::Continue(())
    }

    fn handle_input(&mut self) -> ControlFlow<()> {
        loop {
            let command = match self.commands.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) => return ControlFlow::Continue(()),
                Err(TryRecvError::Disconnected) => return ControlFlow::Break(()),
            };
            self.execute(command)?;
        }
    }

    fn execute(&mut self, command: UserCommand) -> ControlFlow<()> {
        let result = match command {
            UserCommand::Chat(text) => self.session.send_chat(&text),
            UserCommand::Nick(name) => {
                let result = self.session.set_nickname(&name);
                if result.is_ok() && self.session.is_idle() {
                    self.print_notice(&format!("Nickname set to {name}."));
                }
                result
            }
            UserCommand::Ping => self.session.ping(),
            UserCommand::Connect => {
                self.connect();
                Ok(())
            }
            UserCommand::Disconnect => self.session.disconnect(),
            UserCommand::Quit => return ControlFlow::Break(()),
            UserCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            UserCommand::Invalid(hint) => {
                self.print_notice(&hint);
                Ok(())
            }
            UserCommand::Empty => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(ClientError::NotConnected) => self.print_notice("Not connected. Type /connect."),
            // The session already reported the teardown
            Err(ClientError::Connection(_)) => {}
            Err(e) => self.print_notice(&e.to_string()),
        }
        ControlFlow::Continue(())
    }

    fn connect(&mut self) {
        if !self.session.is_idle() {
            self.print_notice(&ClientError::AlreadyConnected.to_string());
            return;
        }
        if let Err(e) = self.try_connect() {
            tracing::warn!("Connect failed: {}", e);
            self.print_notice(&format!("Connection failed: {e}"));
        }
    }

    fn try_connect(&mut self) -> Result<(), ClientError> {
        let addrs = connector::resolve(&self.config.host, self.config.port)?;
        let id = SocketId::new(self.next_id);
        self.next_id += 1;

        let (stream, addr) = connector::connect(&mut self.reactor, id, &addrs)?;
        if let Err((e, mut stream)) = self.session.attach(id, stream, &addr.to_string()) {
            self.reactor.unsubscribe(&mut stream, id)?;
            return Err(e);
        }
        Ok(())
    }

    fn on_connect_complete(&mut self) {
        let Some(stream) = self.session.stream() else {
            return;
        };
        match connector::connect_status(stream) {
            ConnectStatus::Connected(addr) => {
                tracing::debug!("Connected to {}", addr);
                let id = self.session.socket_id();
                // Connect readiness is only wanted once
                if let (Some(id), Some(stream)) = (id, self.session.stream_mut()) {
                    if let Err(e) = self.reactor.subscribe(stream, id, Interests::PEER) {
                        tracing::warn!("Failed to resubscribe {}: {}", id, e);
                    }
                }
                self.session.on_connect_ready();
            }
            ConnectStatus::Pending => tracing::trace!("Connect still pending"),
            ConnectStatus::Failed(e) => self.session.connect_failed(e),
        }
    }

    fn on_hangup(&mut self, reason: &str) {
        let failed_connect = match self.session.stream() {
            Some(stream) if self.session.state() == ConnectionState::Connecting => {
                match connector::connect_status(stream) {
                    ConnectStatus::Failed(e) => Some(e),
                    _ => None,
                }
            }
            _ => None,
        };
        match failed_connect {
            Some(e) => self.session.connect_failed(e),
            None => self.session.on_hangup(reason),
        }
    }

    /// Print pending events and unsubscribe torn-down sockets.
    fn flush(&mut self) {
        for mut connection in self.session.take_retired() {
            let id = connection.id();
            if let Err(e) = self.reactor.unsubscribe(connection.stream_mut(), id) {
                tracing::warn!("Failed to unsubscribe {}: {}", id, e);
            }
        }
        for event in self.session.take_events() {
            println!("{}", display::render(&event, now_millis()));
        }
    }

    fn shutdown(&mut self) {
        if !self.session.is_idle() {
            let _ = self.session.disconnect();
        }
        self.flush();
    }

    fn print_notice(&self, text: &str) {
        println!("{}", display::notice(text, now_millis()));
    }
}
