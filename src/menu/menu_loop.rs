//! Loop engine shared by every menu.
//!
//! A `MenuLoop` owns one prompt and calls it until the prompt asks to stop.
//! Sub-menus build their own `MenuLoop`, drive it to completion and read their
//! result back out of the prompt, so menus nest without recursion and without
//! a global menu stack.

use async_trait::async_trait;

use crate::error::PromptError;

/// Running flag handed to the prompt on every iteration.
#[derive(Debug, Default)]
pub struct LoopControl {
    running: bool,
}

impl LoopControl {
    /// End the loop after the current iteration returns.
    pub fn stop_loop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// One presentation of a menu.
#[async_trait]
pub trait MenuPrompt: Send {
    async fn prompt(&mut self, control: &mut LoopControl) -> Result<(), PromptError>;
}

pub struct MenuLoop<P> {
    prompt: P,
    control: LoopControl,
}

impl<P: MenuPrompt> MenuLoop<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            control: LoopControl::default(),
        }
    }

    /// Bind a different prompt. The running flag is left as it is.
    pub fn initialize(&mut self, prompt: P) {
        self.prompt = prompt;
    }

    /// Run the prompt exactly once.
    pub async fn show_once(&mut self) -> Result<(), PromptError> {
        self.prompt.prompt(&mut self.control).await
    }

    /// Run the prompt until it calls `stop_loop`. A prompt error ends the loop
    /// and is returned.
    pub async fn show_loop(&mut self) -> Result<(), PromptError> {
        self.control.running = true;
        while self.control.running {
            if let Err(err) = self.prompt.prompt(&mut self.control).await {
                self.control.running = false;
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn stop_loop(&mut self) {
        self.control.stop_loop();
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn into_inner(self) -> P {
        self.prompt
    }
}
