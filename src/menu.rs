//! Menu navigation as an explicit state machine.
//!
//! ```text
//!              SelectDevice(i)              Action(a)
//!   MainMenu ──────────────────▶ ControlMenu(i) ───▶ (transmit, stay)
//!     │  ▲                            │
//!     │  └──────────── Back ──────────┘
//!     │  ▲
//!     │  └──── NameEntered / Back ────┐
//!     └───────── AddDevice ──────────▶ AddDevice
//!
//!   MainMenu ── Back ──▶ Exited
//! ```
//!
//! Navigation is flat: `Back` from any sub-screen returns straight to
//! [`Screen::MainMenu`], there is no screen stack. [`transition`] is a pure
//! table; running the resulting [`Effect`] is up to the caller (see
//! [`crate::remote::Remote::dispatch`]).

use crate::frame::Command;
use crate::registry::{Device, DeviceName};

/// Label of the main menu entry that adds a device.
pub const ADD_DEVICE_LABEL: &str = "+ Add Device";

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Screen {
    /// Device list plus the add entry.
    #[default]
    MainMenu,
    /// Actions for the device at this registry index.
    ControlMenu(usize),
    /// Name prompt for a new device.
    AddDevice,
    /// The user left the application.
    Exited,
}

/// The four actions offered for every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ControlAction {
    /// Raise.
    Up,
    /// Stop.
    Stop,
    /// Lower.
    Down,
    /// Pair the remote with a receiver (sends [`Command::Prog`]).
    Pair,
}

impl ControlAction {
    /// Actions in menu order.
    pub const ALL: [ControlAction; 4] = [
        ControlAction::Up,
        ControlAction::Stop,
        ControlAction::Down,
        ControlAction::Pair,
    ];

    /// The command transmitted for this action.
    pub const fn command(self) -> Command {
        match self {
            ControlAction::Up => Command::Up,
            ControlAction::Stop => Command::Stop,
            ControlAction::Down => Command::Down,
            ControlAction::Pair => Command::Prog,
        }
    }

    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            ControlAction::Up => "Up",
            ControlAction::Stop => "Stop",
            ControlAction::Down => "Down",
            ControlAction::Pair => "Pair (Prog)",
        }
    }
}

/// Input from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum MenuEvent {
    /// A device was picked from the main menu.
    SelectDevice(usize),
    /// The add entry was picked from the main menu.
    AddDevice,
    /// A name was confirmed in the name prompt.
    NameEntered(DeviceName),
    /// An action was picked in a control menu.
    Action(ControlAction),
    /// The back key was pressed.
    Back,
}

/// Work the caller has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Effect {
    /// Nothing.
    None,
    /// Register a device with this name.
    Register(DeviceName),
    /// Send `command` from the device at `index`.
    Transmit {
        /// Registry index.
        index: usize,
        /// Command to send.
        command: Command,
    },
}

/// The transition table.
///
/// Events that make no sense on the current screen leave it unchanged.
pub fn transition(screen: Screen, event: MenuEvent) -> (Screen, Effect) {
    match (screen, event) {
        (Screen::Exited, _) => (Screen::Exited, Effect::None),
        (Screen::MainMenu, MenuEvent::Back) => (Screen::Exited, Effect::None),
        (_, MenuEvent::Back) => (Screen::MainMenu, Effect::None),
        (Screen::MainMenu, MenuEvent::SelectDevice(index)) => {
            (Screen::ControlMenu(index), Effect::None)
        }
        (Screen::MainMenu, MenuEvent::AddDevice) => (Screen::AddDevice, Effect::None),
        (Screen::AddDevice, MenuEvent::NameEntered(name)) => {
            (Screen::MainMenu, Effect::Register(name))
        }
        (Screen::ControlMenu(index), MenuEvent::Action(action)) => (
            Screen::ControlMenu(index),
            Effect::Transmit {
                index,
                command: action.command(),
            },
        ),
        (screen, _) => (screen, Effect::None),
    }
}

/// Tracks the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Menu {
    screen: Screen,
}

impl Menu {
    /// Starts on the main menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Applies `event` and returns the effect to run.
    pub fn handle(&mut self, event: MenuEvent) -> Effect {
        let (next, effect) = transition(self.screen, event);
        self.screen = next;
        effect
    }

    /// Forces the main menu, e.g. after a device vanished.
    pub fn reset(&mut self) {
        self.screen = Screen::MainMenu;
    }
}

/// Labels of the main menu: every device name, then the add entry while
/// `can_add` holds.
pub fn main_menu_entries<'a>(
    devices: &'a [Device],
    can_add: bool,
) -> impl Iterator<Item = &'a str> + 'a {
    devices
        .iter()
        .map(|d| d.name.as_str())
        .chain(can_add.then_some(ADD_DEVICE_LABEL))
}
