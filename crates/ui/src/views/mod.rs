mod attempt;
mod done;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use attempt::TakeQuizView;
pub use done::{LeftView, SubmittedView};
pub use state::ViewError;
