pub mod state;
pub mod termination;
#[cfg(test)]
mod test_utils;
pub mod ui;
