mod array;
mod dictionary;
mod primitive;
pub mod serialize;

pub use array::Array;
pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};
pub use serialize::{escape_name, escape_string, format_real, round_point};
