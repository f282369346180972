pub mod edit;
pub mod ops;

pub use edit::{find_and_replace_first, insert_after_line, insert_before_line};
pub use ops::{append_with_separator, create_dir_all, delete_recursive, write_file};
