//! Interactive menus built on [`MenuLoop`].

pub mod config_menu;
pub mod data_menu;
pub mod install_menu;
pub mod main_menu;
pub mod marketplace_menu;
pub mod menu_loop;
pub mod node_status_menu;
pub mod number_selector;
pub mod path_selector;

pub use install_menu::InteractiveProgress;
pub use main_menu::{show_main_menu, NodeState};
pub use menu_loop::{LoopControl, MenuLoop, MenuPrompt};
