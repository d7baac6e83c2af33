//! VitalAI chat - terminal front-end
//!
//! Mounts one session, prints the transcript as it grows and feeds stdin
//! lines through the view.

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vital_chat::classifier;
use vital_chat::config::ChatConfig;
use vital_chat::intake;
use vital_chat::runtime::{self, SessionError, SessionHandle, SessionUpdate};
use vital_chat::session::TransitionError;
use vital_chat::view::{self, Action, View};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vital_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Configuration
    let config = ChatConfig::from_env()?;
    tracing::info!(
        backend = ?config.classifier.backend,
        api_url = %config.classifier.api_url,
        send_language = config.session.send_language,
        language = %config.session.language,
        "Configuration loaded"
    );

    let classifier = classifier::from_config(&config.classifier);
    let mut session = runtime::mount(&config.session, classifier);

    for message in session.transcript() {
        println!("{}", view::render_message(&message));
    }
    println!("Type /help for commands.");

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(SessionUpdate::MessageAppended { message }) => {
                    println!("{}", view::render_message(&message));
                }
                Ok(SessionUpdate::BusyChanged { busy: true }) => println!("VitalAI is typing..."),
                Ok(SessionUpdate::BusyChanged { busy: false } | SessionUpdate::Rejected { .. }) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Display fell behind session updates");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view = View::new();

    let mut quit = false;
    'input: while let Some(line) = lines.next_line().await? {
        let today = Local::now().date_naive();
        for action in view.handle_line(&line, today) {
            if action == Action::Quit {
                quit = true;
                break 'input;
            }
            apply(&session, action).await;
        }
    }

    // On end of piped input, let a pending reply land first
    if !quit {
        session.wait_idle().await;
    }
    session.unmount().await;

    // Closing the last sender lets the printer drain and stop
    drop(session);
    printer.await?;

    Ok(())
}

async fn apply(session: &SessionHandle, action: Action) {
    let result = match action {
        Action::Submit(text) => session.submit(text).await,
        Action::AttachFile(path) => match intake::file_from_path(&path) {
            Ok(file) => session.attach_file(file).await,
            Err(e) => {
                println!("{e}");
                return;
            }
        },
        Action::AttachAppointment(appointment) => session.attach_appointment(appointment).await,
        Action::SetLanguage(code) => session.set_language(code).await,
        Action::Print(text) => {
            println!("{text}");
            return;
        }
        Action::Quit => return,
    };

    match result {
        Ok(()) | Err(SessionError::Rejected(TransitionError::EmptyInput)) => {}
        Err(e) => println!("{e}"),
    }
}
