pub mod alert;
pub mod insight;
pub mod keywords;
pub mod series;
pub mod source;
pub mod time;

pub use alert::*;
pub use insight::*;
pub use keywords::*;
pub use series::*;
pub use source::*;
pub use time::*;
