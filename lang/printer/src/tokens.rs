// Default indentation size
pub const INDENT: isize = 4;

// Symbols

pub const ARROW: &str = "->";
pub const FAT_ARROW: &str = "=>";
pub const BACKSLASH: &str = "\\";
pub const COMMA: &str = ",";
pub const COLON: &str = ":";
pub const DOT: &str = ".";
pub const AT: &str = "@";
pub const UNDERSCORE: &str = "_";

// Keywords

pub const TYPE: &str = "Type";
pub const KIND: &str = "Kind";
