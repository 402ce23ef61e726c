pub mod choice_board;
pub mod menu;
pub mod progress_bar;
pub mod speech_panel;
pub mod target_card;
pub mod target_grid;
pub mod win_banner;
