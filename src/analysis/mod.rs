pub mod blocks;
pub mod color_space;
pub mod copy_move;
pub mod dct;
pub mod features;
pub mod histogram;
pub mod matching;
pub mod suppression;
