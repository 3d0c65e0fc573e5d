use serde::{Deserialize, Serialize};

use super::event::Event;

/// How often a wall reacts to the player interacting with it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionType {
    #[default]
    None,
    Once,
    Repeated,
}

/// Interaction payload of walls and doors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    kind: InteractionType,
    events: Vec<Event>,
    already_interacted_with: bool,
}

impl Interaction {
    pub fn new(kind: InteractionType, events: Vec<Event>) -> Self {
        Self {
            kind,
            events,
            already_interacted_with: false,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> InteractionType {
        self.kind
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn already_interacted_with(&self) -> bool {
        self.already_interacted_with
    }

    /// Events to fire for this interaction, in order. Empty when the wall
    /// is not interactive or a ONCE interaction was already consumed.
    pub fn interact(&mut self) -> Vec<Event> {
        match self.kind {
            InteractionType::None => Vec::new(),
            InteractionType::Once if self.already_interacted_with => Vec::new(),
            InteractionType::Once | InteractionType::Repeated => {
                self.already_interacted_with = true;
                self.events.clone()
            }
        }
    }
}
