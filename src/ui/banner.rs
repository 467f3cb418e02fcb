//! ASCII banner and tagline.

use console::Style;

const BANNER: &str = r"
███████╗██████╗ ███████╗ ██████╗██╗███████╗██╗   ██╗
██╔════╝██╔══██╗██╔════╝██╔════╝██║██╔════╝╚██╗ ██╔╝
███████╗██████╔╝█████╗  ██║     ██║█████╗   ╚████╔╝
╚════██║██╔═══╝ ██╔══╝  ██║     ██║██╔══╝    ╚██╔╝
███████║██║     ███████╗╚██████╗██║██║        ██║
╚══════╝╚═╝     ╚══════╝ ╚═════╝╚═╝╚═╝        ╚═╝
";

const TAGLINE: &str = "GitHub Spec Kit - Spec-Driven Development Toolkit";

/// Print the banner with per-line color cycling and the tagline.
pub fn show_banner() {
    let colors = [
        Style::new().blue().bright(),
        Style::new().blue(),
        Style::new().cyan(),
        Style::new().cyan().bright(),
        Style::new().white(),
        Style::new().white().bright(),
    ];
    for (i, line) in BANNER.trim_matches('\n').lines().enumerate() {
        println!("{}", colors[i % colors.len()].apply_to(line));
    }
    println!(
        "{}",
        Style::new().yellow().bright().italic().apply_to(TAGLINE)
    );
    println!();
}
