//! Help and error colors.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Blue section headers, yellow placeholders, red errors.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Blue.on_default().bold().underline())
		.usage(AnsiColor::Blue.on_default().bold())
		.literal(AnsiColor::BrightWhite.on_default().bold())
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default().bold())
		.invalid(AnsiColor::Yellow.on_default().bold())
		.valid(AnsiColor::Green.on_default())
}
