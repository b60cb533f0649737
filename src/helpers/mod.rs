pub mod thing_helpers;
