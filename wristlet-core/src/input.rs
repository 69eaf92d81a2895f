//! Button input and click configuration

/// Repeat interval used by all the demo apps while a button is held
pub const DEFAULT_REPEAT_INTERVAL_MS: u16 = 100;

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Back,
    Up,
    Select,
    Down,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [ButtonId::Back, ButtonId::Up, ButtonId::Select, ButtonId::Down];

    fn index(self) -> usize {
        match self {
            ButtonId::Back => 0,
            ButtonId::Up => 1,
            ButtonId::Select => 2,
            ButtonId::Down => 3,
        }
    }
}

/// Single-click binding for one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClickBinding {
    /// Interval between repeated clicks while held; 0 disables repeat
    pub repeat_interval_ms: u16,
}

impl ClickBinding {
    pub const fn repeating(repeat_interval_ms: u16) -> Self {
        Self { repeat_interval_ms }
    }

    pub const fn single() -> Self {
        Self {
            repeat_interval_ms: 0,
        }
    }

    /// Number of click events for a press held `held_ms` milliseconds
    ///
    /// The first click fires on press; repeats follow every interval.
    pub fn clicks_for_hold(&self, held_ms: u32) -> u32 {
        if self.repeat_interval_ms == 0 {
            1
        } else {
            1 + held_ms / self.repeat_interval_ms as u32
        }
    }
}

/// Which buttons a window handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClickConfig {
    bindings: [Option<ClickBinding>; 4],
}

impl ClickConfig {
    pub const fn new() -> Self {
        Self {
            bindings: [None; 4],
        }
    }

    /// Bind a button, replacing any previous binding
    pub fn bind(&mut self, button: ButtonId, binding: ClickBinding) -> &mut Self {
        self.bindings[button.index()] = Some(binding);
        self
    }

    pub fn binding(&self, button: ButtonId) -> Option<ClickBinding> {
        self.bindings[button.index()]
    }

    pub fn is_bound(&self, button: ButtonId) -> bool {
        self.binding(button).is_some()
    }
}
