pub mod confetti;
