//! Line-oriented command shell over an [`EventBus`].
//!
//! Used by `topicbus-cli` for both the interactive REPL and the scripted demo.
//! Subscribed handlers write what they receive into an outbox that is drained
//! after every command, so output stays in command order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::debug;

use crate::core::args::Arg;
use crate::core::bus::EventBus;
use crate::core::subscriber::SubscriptionId;
use crate::core::topics::topic::TopicName;

pub const HELP: &str = "\
commands:
  sub <topic> [label]          subscribe a printing handler
  unsub <topic> [label|sub-N]  remove one handler, or the whole topic
  pub <topic> [args..]         publish args to every handler of <topic>
  topics                       list topics and handler counts
  help                         show this text
  quit                         leave the shell";

/// The scenario from the publish/subscribe walkthrough: the second notice is
/// published after unsubscribing and must not be printed.
pub const DEMO_SCRIPT: &[&str] = &[
    "sub Swift printer",
    "pub Swift Hello Swift",
    "pub Swift before-unsubscribe:this-event-is-printed",
    "unsub Swift printer",
    "pub Swift after-unsubscribe:this-event-is-not-printed",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Sub { topic: TopicName, label: Option<String> },
    Unsub { topic: TopicName, target: Option<String> },
    Pub { topic: TopicName, args: Vec<Arg> },
    Topics,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs a topic")]
    MissingTopic(&'static str),
    #[error("`{0}` takes at most {1} argument(s)")]
    TooManyArgs(&'static str, usize),
}

/// Parses one shell line. Words are whitespace separated; publish arguments
/// are typed via [`Arg`]'s `FromStr`.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(ParseError::Empty)?;

    match verb {
        "sub" | "subscribe" => {
            let topic = words.next().ok_or(ParseError::MissingTopic("sub"))?.to_owned();
            let label = words.next().map(str::to_owned);
            if words.next().is_some() {
                return Err(ParseError::TooManyArgs("sub", 2));
            }
            Ok(Command::Sub { topic, label })
        }
        "unsub" | "unsubscribe" => {
            let topic = words.next().ok_or(ParseError::MissingTopic("unsub"))?.to_owned();
            let target = words.next().map(str::to_owned);
            if words.next().is_some() {
                return Err(ParseError::TooManyArgs("unsub", 2));
            }
            Ok(Command::Unsub { topic, target })
        }
        "pub" | "publish" => {
            let topic = words.next().ok_or(ParseError::MissingTopic("pub"))?.to_owned();
            let args = words
                .map(|w| match w.parse::<Arg>() {
                    Ok(arg) => arg,
                    Err(never) => match never {},
                })
                .collect();
            Ok(Command::Pub { topic, args })
        }
        "topics" | "ls" => Ok(Command::Topics),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_owned())),
    }
}

/// Reads a `sub-<n>` word back into the id it displays.
fn parse_subscription_id(word: &str) -> Option<SubscriptionId> {
    word.strip_prefix("sub-")
        .and_then(|raw| raw.parse().ok())
        .map(SubscriptionId::from_raw)
}

/// Executes [`Command`]s against a bus it owns.
pub struct Shell {
    bus: EventBus,
    labels: HashMap<String, (TopicName, SubscriptionId)>,
    outbox: Arc<Mutex<Vec<String>>>,
}

impl Shell {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            labels: HashMap::new(),
            outbox: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Parses and runs one line. Returns the lines to show the user; `None`
    /// means the user asked to quit.
    pub fn run_line(&mut self, line: &str) -> Option<Vec<String>> {
        match parse_line(line) {
            Ok(Command::Quit) => None,
            Ok(command) => Some(self.execute(command)),
            Err(ParseError::Empty) => Some(Vec::new()),
            Err(e) => Some(vec![format!("error: {e}")]),
        }
    }

    pub fn execute(&mut self, command: Command) -> Vec<String> {
        debug!(?command, "Executing shell command");
        let mut out = match command {
            Command::Sub { topic, label } => self.sub(topic, label),
            Command::Unsub { topic, target } => self.unsub(&topic, target),
            Command::Pub { topic, args } => {
                let delivered = self.bus.publish(&topic, &args).len();
                vec![format!("published to '{topic}': {delivered} handler(s)")]
            }
            Command::Topics => self.list_topics(),
            Command::Help => HELP.lines().map(str::to_owned).collect(),
            Command::Quit => Vec::new(),
        };

        let mut received = self.drain_outbox();
        if !received.is_empty() {
            // Handler output happens before the summary line of a publish.
            received.append(&mut out);
            out = received;
        }
        out
    }

    fn sub(&mut self, topic: TopicName, label: Option<String>) -> Vec<String> {
        if let Some(label) = &label {
            if parse_subscription_id(label).is_some() {
                return vec![format!("error: label '{label}' looks like a subscription id")];
            }
            if self.labels.contains_key(label) {
                return vec![format!("error: label '{label}' is already in use")];
            }
        }

        let outbox = Arc::clone(&self.outbox);
        let shown = label.clone();
        let handler_topic = topic.clone();
        let id = self.bus.subscribe(&topic, move |args| {
            let rendered: Vec<String> = args.iter().map(Arg::to_string).collect();
            let who = shown.as_deref().unwrap_or("handler");
            outbox
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(format!("[{who}] {handler_topic}: {}", rendered.join(" ")));
        });

        if let Some(label) = label {
            self.labels.insert(label, (topic.clone(), id));
        }
        vec![format!("subscribed {id} to '{topic}'")]
    }

    fn unsub(&mut self, topic: &str, target: Option<String>) -> Vec<String> {
        let Some(target) = target else {
            let removed = self.bus.unsubscribe(topic, None);
            self.labels.retain(|_, (t, _)| t != topic);
            return vec![format!("unsubscribed all from '{topic}': {removed}")];
        };

        let id = match self.labels.get(&target) {
            Some((labelled_topic, id)) if labelled_topic == topic => Some(*id),
            Some(_) => None,
            None => parse_subscription_id(&target),
        };

        let removed = match id {
            Some(id) => self.bus.unsubscribe(topic, Some(id)),
            None => false,
        };
        if removed {
            self.labels.retain(|_, (t, sub)| !(t == topic && Some(*sub) == id));
        }
        vec![format!("unsubscribed {target} from '{topic}': {removed}")]
    }

    fn list_topics(&self) -> Vec<String> {
        let topics = self.bus.topics();
        if topics.is_empty() {
            return vec!["(no topics)".to_owned()];
        }
        topics
            .into_iter()
            .map(|t| {
                let count = self.bus.handler_count(&t);
                format!("{t}: {count} handler(s)")
            })
            .collect()
    }

    fn drain_outbox(&self) -> Vec<String> {
        std::mem::take(&mut *self.outbox.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
