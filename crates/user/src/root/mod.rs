mod login;
mod register;

pub use login::*;
pub use register::*;

use std::ops::Deref;

#[derive(Clone)]
pub struct Command(pub nutriplan_shared::State);

impl Deref for Command {
    type Target = nutriplan_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: nutriplan_shared::State) -> Self {
        Self(state)
    }
}
