pub mod directive;
pub mod marker;
pub mod normalize;
pub mod section;

pub use directive::{extract_directive, parse_directive, DirectiveError};
pub use marker::completion_marker;
pub use normalize::{force_completed, strip_on_completion};
pub use section::{insert_after_heading, insert_under_section};
