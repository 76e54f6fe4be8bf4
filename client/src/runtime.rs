//! Owning task for a conversation.
//!
//! Every event, command and query for one conversation goes through a single channel
//! and is handled to completion before the next one. Typing expiry is driven from the
//! same loop, so it can never interleave with reconciliation.

use crate::conversation::{Command, Conversation, ConversationError, ConversationSnapshot, Result};
use huddle_messaging::{ConversationId, Message, UserId};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};
use uuid::Uuid;

const COMMAND_BUFFER: usize = 256;

enum RuntimeCommand {
    Event(Message),
    StartedTyping(UserId),
    Dispatch {
        command: Command,
        responder: oneshot::Sender<Option<&'static str>>,
    },
    PostMessage {
        payload: Map<String, Value>,
        responder: oneshot::Sender<Result<()>>,
    },
    Send {
        text: String,
        responder: oneshot::Sender<Uuid>,
    },
    Snapshot(oneshot::Sender<ConversationSnapshot>),
    Typing(oneshot::Sender<BTreeSet<UserId>>),
    Shutdown(oneshot::Sender<Conversation>),
}

pub struct ConversationRuntime {
    conversation: Conversation,
    command_rx: mpsc::Receiver<RuntimeCommand>,
}

impl ConversationRuntime {
    /// Move `conversation` onto its own task and return a handle to it.
    pub fn spawn(conversation: Conversation) -> ConversationHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let id = conversation.id().clone();
        let runtime = Self {
            conversation,
            command_rx,
        };
        let runtime_task = tokio::spawn(async move { runtime.run().await });
        ConversationHandle {
            id,
            command_tx,
            runtime_task,
        }
    }

    async fn run(mut self) {
        info!(channel = %self.conversation.id(), "conversation task started");

        loop {
            let deadline = self.conversation.next_typing_deadline();
            tokio::select! {
                // due expiries are applied before any input queued behind them
                biased;

                _ = wait_for(deadline) => {
                    self.conversation.expire_typing(Instant::now());
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(RuntimeCommand::Event(event)) => self.conversation.add_message(event),
                        Some(RuntimeCommand::StartedTyping(user)) => {
                            self.conversation.started_typing(user)
                        }
                        Some(RuntimeCommand::Dispatch { command, responder }) => {
                            let _ = responder.send(self.conversation.dispatch(command));
                        }
                        Some(RuntimeCommand::PostMessage { payload, responder }) => {
                            let _ = responder.send(self.conversation.post_message(payload));
                        }
                        Some(RuntimeCommand::Send { text, responder }) => {
                            let _ = responder.send(self.conversation.send(text));
                        }
                        Some(RuntimeCommand::Snapshot(responder)) => {
                            let _ = responder.send(self.conversation.snapshot());
                        }
                        Some(RuntimeCommand::Typing(responder)) => {
                            let _ = responder.send(self.conversation.typing());
                        }
                        Some(RuntimeCommand::Shutdown(responder)) => {
                            info!(channel = %self.conversation.id(), "conversation task stopping");
                            let _ = responder.send(self.conversation);
                            return;
                        }
                        None => break,
                    }
                }
            }
        }

        debug!(channel = %self.conversation.id(), "all handles dropped, conversation task exiting");
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Handle to a conversation running on its own task.
pub struct ConversationHandle {
    id: ConversationId,
    command_tx: mpsc::Sender<RuntimeCommand>,
    runtime_task: JoinHandle<()>,
}

impl ConversationHandle {
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub async fn add_message(&self, event: Message) -> Result<()> {
        self.submit(RuntimeCommand::Event(event)).await
    }

    pub async fn started_typing(&self, user: UserId) -> Result<()> {
        self.submit(RuntimeCommand::StartedTyping(user)).await
    }

    /// Issue `command`; resolves to the backend method used, or `None` when skipped.
    pub async fn dispatch(&self, command: Command) -> Result<Option<&'static str>> {
        self.request(|responder| RuntimeCommand::Dispatch { command, responder })
            .await
    }

    pub async fn post_message(&self, payload: Map<String, Value>) -> Result<()> {
        self.request(|responder| RuntimeCommand::PostMessage { payload, responder })
            .await?
    }

    pub async fn send(&self, text: impl Into<String>) -> Result<Uuid> {
        let text = text.into();
        self.request(|responder| RuntimeCommand::Send { text, responder })
            .await
    }

    pub async fn snapshot(&self) -> Result<ConversationSnapshot> {
        self.request(RuntimeCommand::Snapshot).await
    }

    pub async fn typing(&self) -> Result<BTreeSet<UserId>> {
        self.request(RuntimeCommand::Typing).await
    }

    /// Stop the task and take the conversation back.
    pub async fn shutdown(self) -> Result<Conversation> {
        let ConversationHandle {
            id: _,
            command_tx,
            runtime_task,
        } = self;

        let (responder, rx) = oneshot::channel();
        command_tx
            .send(RuntimeCommand::Shutdown(responder))
            .await
            .map_err(|_| ConversationError::Closed)?;
        let conversation = rx.await.map_err(|_| ConversationError::Closed)?;
        runtime_task.await.map_err(|_| ConversationError::Closed)?;
        Ok(conversation)
    }

    async fn submit(&self, command: RuntimeCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| ConversationError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RuntimeCommand,
    ) -> Result<T> {
        let (responder, rx) = oneshot::channel();
        self.submit(build(responder)).await?;
        rx.await.map_err(|_| ConversationError::Closed)
    }
}
