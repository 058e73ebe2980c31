//! Commands, their parsed form, and the submission handle.
//!
//! A [`Command`] carries the raw text a client (or an NPC task) sent plus a
//! private one-shot reply channel. The [`Submitter`] validates and enqueues
//! commands without ever waiting on the tick loop; the caller then awaits
//! the reply, which the tick loop sends exactly once after applying the
//! command.
//!
//! Text is interpreted by [`Instruction::parse`]: anything starting with
//! `>` is a [`Directive`], everything else is a movement key.

use gridworld_types::{ActorId, CommandStatus, Direction, Viewport};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Prefix that marks a directive.
pub const DIRECTIVE_PREFIX: char = '>';

/// Reply for a submission without an actor identifier.
pub const MISSING_ACTOR: &str = "provide a uid string";

/// Reply for a submission without command text.
pub const MISSING_TEXT: &str = "provide a key pressed";

/// A queued command awaiting the next tick.
#[derive(Debug)]
pub struct Command {
    /// Actor issuing the command.
    pub actor: ActorId,
    /// Trimmed command text.
    pub text: String,
    /// Reply channel; consumed by [`Command::acknowledge`].
    reply: oneshot::Sender<CommandStatus>,
}

impl Command {
    /// Create a command and the receiver its acknowledgement arrives on.
    pub fn new(
        actor: ActorId,
        text: impl Into<String>,
    ) -> (Self, oneshot::Receiver<CommandStatus>) {
        let (reply, rx) = oneshot::channel();
        (
            Self {
                actor,
                text: text.into(),
                reply,
            },
            rx,
        )
    }

    /// Send the acknowledgement. Consumes the command, so it can only
    /// happen once.
    pub fn acknowledge(self, status: CommandStatus) {
        if self.reply.send(status).is_err() {
            warn!(actor = %self.actor, "command acknowledgement dropped: submitter went away");
        }
    }
}

/// A parsed directive verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Install the help overlay.
    Help,
    /// Remove the current overlay.
    Clear,
    /// Change the actor's viewport. `None` when the arguments were wrong,
    /// which makes the directive a no-op.
    Resize(Option<Viewport>),
    /// Install the self-refreshing profile overlay.
    Profile,
    /// Damage adjacent actors.
    Attack,
    /// Anything else; carries the verb for the reply message.
    Unknown(String),
}

/// What a command's text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Step in a direction. `None` for an unrecognized key, which leaves
    /// the actor where it is.
    Move(Option<Direction>),
    /// Run a directive.
    Directive(Directive),
}

impl Instruction {
    /// Interpret command text.
    pub fn parse(text: &str) -> Self {
        text.strip_prefix(DIRECTIVE_PREFIX).map_or_else(
            || Self::Move(Direction::from_key(text.trim())),
            |rest| Self::Directive(Directive::parse(rest)),
        )
    }
}

impl Directive {
    /// Parse the text following the `>` prefix. Case-insensitive.
    pub fn parse(body: &str) -> Self {
        let lowered = body.trim().to_lowercase();
        let parts: Vec<&str> = lowered.split_whitespace().collect();
        let verb = parts.first().copied().unwrap_or_default();
        match verb {
            "help" => Self::Help,
            "clear" => Self::Clear,
            "resize" => Self::Resize(parse_resize(&parts)),
            "profile" => Self::Profile,
            "attack" => Self::Attack,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// `resize W H` takes exactly two dimensions.
fn parse_resize(parts: &[&str]) -> Option<Viewport> {
    match parts {
        [_, width, height] => Some(Viewport::new(width.parse().ok()?, height.parse().ok()?)),
        _ => None,
    }
}

/// Cloneable handle that validates and enqueues commands.
///
/// Sending never blocks: the channel is unbounded and drained into the
/// world's pending queue by the intake task.
#[derive(Debug, Clone)]
pub struct Submitter {
    /// Intake side of the command channel.
    tx: mpsc::UnboundedSender<Command>,
}

impl Submitter {
    /// Wrap the sending half of the intake channel.
    pub const fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    /// Submit a command and wait for its acknowledgement.
    ///
    /// Blank identifiers or text are rejected with
    /// [`StatusCode::BadRequest`](gridworld_types::StatusCode::BadRequest)
    /// before anything is queued. If the engine has stopped the reply is
    /// [`CommandStatus::unavailable`].
    pub async fn submit(&self, actor: &str, text: &str) -> CommandStatus {
        let actor = actor.trim();
        if actor.is_empty() {
            return CommandStatus::bad_request(MISSING_ACTOR);
        }
        let text = text.trim();
        if text.is_empty() {
            return CommandStatus::bad_request(MISSING_TEXT);
        }
        let (command, rx) = Command::new(ActorId::new(actor), text);
        if self.tx.send(command).is_err() {
            return CommandStatus::unavailable();
        }
        rx.await.unwrap_or_else(|_| CommandStatus::unavailable())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridworld_types::StatusCode;

    use super::*;

    #[test]
    fn movement_keys_parse_as_moves() {
        assert_eq!(
            Instruction::parse("mw"),
            Instruction::Move(Some(Direction::Up))
        );
        assert_eq!(
            Instruction::parse("md"),
            Instruction::Move(Some(Direction::Right))
        );
        assert_eq!(Instruction::parse("zz"), Instruction::Move(None));
    }

    #[test]
    fn directives_are_case_insensitive_and_trimmed() {
        assert_eq!(
            Instruction::parse(">  HeLp "),
            Instruction::Directive(Directive::Help)
        );
        assert_eq!(Directive::parse("attack"), Directive::Attack);
        assert_eq!(Directive::parse("clear"), Directive::Clear);
        assert_eq!(Directive::parse("profile"), Directive::Profile);
    }

    #[test]
    fn resize_needs_exactly_two_numeric_arguments() {
        assert_eq!(
            Directive::parse("resize 100 30"),
            Directive::Resize(Some(Viewport::new(100, 30)))
        );
        assert_eq!(Directive::parse("resize 100"), Directive::Resize(None));
        assert_eq!(Directive::parse("resize 1 2 3"), Directive::Resize(None));
        assert_eq!(Directive::parse("resize a b"), Directive::Resize(None));
        assert_eq!(Directive::parse("resize -1 5"), Directive::Resize(None));
    }

    #[test]
    fn unknown_verbs_keep_their_name() {
        assert_eq!(
            Directive::parse("dance now"),
            Directive::Unknown("dance".to_owned())
        );
        assert_eq!(Directive::parse(""), Directive::Unknown(String::new()));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_enqueue() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let submitter = Submitter::new(tx);

        let status = submitter.submit("  ", "mw").await;
        assert_eq!(status.code, StatusCode::BadRequest);
        assert_eq!(status.message, MISSING_ACTOR);

        let status = submitter.submit("alice", " ").await;
        assert_eq!(status.code, StatusCode::BadRequest);
        assert_eq!(status.message, MISSING_TEXT);

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn submit_waits_for_acknowledgement() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        let submitter = Submitter::new(tx);
        let responder = tokio::spawn(async move {
            let command = rx.recv().await.unwrap();
            assert_eq!(command.actor.as_str(), "alice");
            assert_eq!(command.text, ">help");
            command.acknowledge(CommandStatus::ok_with("done"));
        });
        let status = submitter.submit(" alice ", " >help ").await;
        assert_eq!(status, CommandStatus::ok_with("done"));
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn closed_intake_reports_unavailable() {
        let (tx, rx) = mpsc::unbounded_channel::<Command>();
        drop(rx);
        let status = Submitter::new(tx).submit("alice", "mw").await;
        assert_eq!(status.code, StatusCode::Unavailable);
    }

    #[tokio::test]
    async fn dropped_command_reports_unavailable() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        let submitter = Submitter::new(tx);
        let dropper = tokio::spawn(async move {
            drop(rx.recv().await);
        });
        let status = submitter.submit("alice", "mw").await;
        assert_eq!(status.code, StatusCode::Unavailable);
        dropper.await.unwrap();
    }
}
