use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 102, g: 217, b: 239 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 220 };
pub const SEPARATOR: Color = Color::TrueColor { r: 117, g: 113, b: 94 };
pub const ADDRESS: Color = Color::TrueColor { r: 166, g: 226, b: 46 };
pub const PORT: Color = Color::TrueColor { r: 230, g: 219, b: 116 };
pub const CIDR: Color = Color::TrueColor { r: 253, g: 151, b: 31 };
