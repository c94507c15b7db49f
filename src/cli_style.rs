use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let accent = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    let ok = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(accent)
        .header(accent)
        .literal(ok)
        .valid(ok)
        .invalid(bad)
        .error(bad)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const AMBER: Color = Color::Rgb {
        r: 255,
        g: 191,
        b: 0,
    };
    pub const CORAL: Color = Color::Rgb {
        r: 255,
        g: 127,
        b: 80,
    };
    pub const TEAL: Color = Color::Rgb {
        r: 0,
        g: 200,
        b: 180,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 230,
        b: 118,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const DOUBLE_TOP_LEFT: &str = "╔";
    pub const DOUBLE_TOP_RIGHT: &str = "╗";
    pub const DOUBLE_BOTTOM_LEFT: &str = "╚";
    pub const DOUBLE_BOTTOM_RIGHT: &str = "╝";
    pub const DOUBLE_HORIZONTAL: &str = "═";
    pub const DOUBLE_VERTICAL: &str = "║";

    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const ARROW_RIGHT: &str = "▶";
    pub const BULLET: &str = "●";
    pub const BULLET_EMPTY: &str = "○";
    pub const DIAMOND: &str = "◆";
    pub const STAR: &str = "★";
    pub const STAR_EMPTY: &str = "☆";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_banner() {
    let banner = r#"
    ███████╗██╗   ██╗███████╗███╗   ██╗████████╗██████╗ ███████╗███████╗██╗  ██╗
    ██╔════╝██║   ██║██╔════╝████╗  ██║╚══██╔══╝██╔══██╗██╔════╝██╔════╝██║ ██╔╝
    █████╗  ██║   ██║█████╗  ██╔██╗ ██║   ██║   ██║  ██║█████╗  ███████╗█████╔╝
    ██╔══╝  ╚██╗ ██╔╝██╔══╝  ██║╚██╗██║   ██║   ██║  ██║██╔══╝  ╚════██║██╔═██╗
    ███████╗ ╚████╔╝ ███████╗██║ ╚████║   ██║   ██████╔╝███████╗███████║██║  ██╗
    ╚══════╝  ╚═══╝  ╚══════╝╚═╝  ╚═══╝   ╚═╝   ╚═════╝ ╚══════╝╚══════╝╚═╝  ╚═╝
"#;

    let gradient = [
        colors::AMBER,
        colors::AMBER,
        colors::ORANGE,
        colors::ORANGE,
        colors::CORAL,
        colors::CORAL,
        colors::RED,
    ];

    for (i, line) in banner.lines().enumerate() {
        let color = gradient.get(i).unwrap_or(&colors::AMBER);
        println!("{}", line.with(*color).bold());
    }

    let subtitle = "  ═══════════════════  EVENT DISCOVERY  ═══════════════════";
    println!("{}", subtitle.with(colors::DIM));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.with(colors::GREEN).bold(),
        message.with(colors::GREEN)
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.with(colors::RED).bold(),
        message.with(colors::RED)
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "⚠".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Section Headers
// ═══════════════════════════════════════════════════════════════════════════════

const SECTION_WIDTH: usize = 72;

pub fn print_section_header(title: &str) {
    let title_len = title.width();
    let padding = SECTION_WIDTH.saturating_sub(title_len + 4) / 2;

    println!();
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::TEAL));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL.repeat(padding).with(colors::TEAL)
    );
    print!(
        " {} ",
        title.with(colors::AMBER).bold().attribute(Attribute::Italic)
    );
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH.saturating_sub(title_len + 4 + padding))
            .with(colors::TEAL)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::TEAL));
}

pub fn print_section_footer() {
    print!("{}", box_chars::ROUND_BOTTOM_LEFT.with(colors::TEAL));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(SECTION_WIDTH)
            .with(colors::TEAL)
    );
    println!("{}", box_chars::ROUND_BOTTOM_RIGHT.with(colors::TEAL));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key-Value and List Display
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        box_chars::BULLET.with(colors::CORAL),
        format!("{}:", key).with(colors::DIM),
        value.with(colors::WHITE)
    );
}

pub fn print_list_item(item: &str, indent: usize) {
    println!(
        "{}{}  {}",
        "  ".repeat(indent),
        box_chars::ARROW_RIGHT.with(colors::TEAL),
        item.with(colors::WHITE)
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        box_chars::BULLET_EMPTY.with(colors::DIM),
        message.with(colors::DIM).attribute(Attribute::Italic)
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        TableBuilder {
            col_widths: headers.iter().map(|h| h.width()).collect(),
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    /// Cells past the header count are dropped.
    pub fn add_row(&mut self, row: Vec<&str>) {
        let row: Vec<String> = row
            .into_iter()
            .take(self.headers.len())
            .map(String::from)
            .collect();
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn print_border(&self, left: &str, junction: &str, right: &str) {
        let segments: Vec<String> = self
            .col_widths
            .iter()
            .map(|w| box_chars::SINGLE_HORIZONTAL.repeat(w + 2))
            .collect();
        println!(
            "{}{}{}",
            left.with(colors::TEAL),
            segments.join(junction).with(colors::TEAL),
            right.with(colors::TEAL)
        );
    }

    fn print_cells(&self, cells: &[String], color: CtColor, bold: bool) {
        print!("{}", box_chars::SINGLE_VERTICAL.with(colors::TEAL));
        for (i, width) in self.col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let styled = if bold {
                cell.with(color).bold()
            } else {
                cell.with(color)
            };
            print!(
                " {}{} {}",
                styled,
                " ".repeat(width.saturating_sub(cell.width())),
                box_chars::SINGLE_VERTICAL.with(colors::TEAL)
            );
        }
        println!();
    }

    pub fn print(&self) {
        self.print_border(box_chars::ROUND_TOP_LEFT, box_chars::T_TOP, box_chars::ROUND_TOP_RIGHT);
        self.print_cells(&self.headers, colors::AMBER, true);
        self.print_border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        for row in &self.rows {
            self.print_cells(row, colors::WHITE, false);
        }
        self.print_border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt Styling
// ═══════════════════════════════════════════════════════════════════════════════

/// Shows who is signed in, and the unread count when there is one.
pub fn get_prompt(username: Option<&str>, unread: usize) -> String {
    let who = match username {
        Some(name) => name.with(colors::TEAL).bold().to_string(),
        None => "guest".with(colors::DIM).to_string(),
    };
    let badge = if unread > 0 {
        format!(" {}", format!("({})", unread).with(colors::CORAL).bold())
    } else {
        String::new()
    };
    format!(
        "{}{} {}{}{} ",
        who,
        badge,
        "❯".with(colors::AMBER).bold(),
        "❯".with(colors::ORANGE).bold(),
        "❯".with(colors::CORAL).bold(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Welcome Message
// ═══════════════════════════════════════════════════════════════════════════════

fn print_boxed_line(content: &str, visible_len: usize, box_width: usize) {
    print!("  {}", box_chars::DOUBLE_VERTICAL.with(colors::CORAL));
    print!("{}", content);
    print!("{}", " ".repeat(box_width.saturating_sub(visible_len)));
    println!("{}", box_chars::DOUBLE_VERTICAL.with(colors::CORAL));
}

pub fn print_welcome(base_url: &str) {
    print_banner();

    let box_width = 64;

    print!("  {}", box_chars::DOUBLE_TOP_LEFT.with(colors::CORAL));
    print!(
        "{}",
        box_chars::DOUBLE_HORIZONTAL
            .repeat(box_width)
            .with(colors::CORAL)
    );
    println!("{}", box_chars::DOUBLE_TOP_RIGHT.with(colors::CORAL));

    for (key, value) in [("Backend", base_url), ("Version", env!("APP_VERSION"))] {
        let content = format!("  {} {}", format!("{}:", key).with(colors::DIM), value);
        print_boxed_line(&content, key.width() + value.width() + 4, box_width);
    }
    print_boxed_line("", 0, box_width);

    let help_msg = "  Type 'help' for available commands";
    print_boxed_line(
        &help_msg.with(colors::DIM).to_string(),
        help_msg.width(),
        box_width,
    );

    print!("  {}", box_chars::DOUBLE_BOTTOM_LEFT.with(colors::CORAL));
    print!(
        "{}",
        box_chars::DOUBLE_HORIZONTAL
            .repeat(box_width)
            .with(colors::CORAL)
    );
    println!("{}", box_chars::DOUBLE_BOTTOM_RIGHT.with(colors::CORAL));
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Help Display
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Account,
    Events,
    Notifications,
    System,
}

impl CommandGroup {
    fn title(self) -> &'static str {
        match self {
            CommandGroup::Account => "Account",
            CommandGroup::Events => "Events & Bookmarks",
            CommandGroup::Notifications => "Notifications",
            CommandGroup::System => "System",
        }
    }

    fn color(self) -> CtColor {
        match self {
            CommandGroup::Account => colors::TEAL,
            CommandGroup::Events => colors::AMBER,
            CommandGroup::Notifications => colors::CORAL,
            CommandGroup::System => colors::ORANGE,
        }
    }
}

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
    pub group: CommandGroup,
}

pub fn print_help(commands: &[CommandHelp]) {
    println!();
    print_section_header("Available Commands");
    println!();

    for group in [
        CommandGroup::Account,
        CommandGroup::Events,
        CommandGroup::Notifications,
        CommandGroup::System,
    ] {
        println!(
            "  {} {}",
            box_chars::DIAMOND.with(group.color()),
            group.title().with(group.color()).bold()
        );
        for cmd in commands.iter().filter(|c| c.group == group) {
            println!(
                "      {} {}  {}",
                cmd.name.with(colors::GREEN).bold(),
                cmd.args.with(colors::DIM),
                cmd.description.with(colors::WHITE)
            );
        }
        println!();
    }

    print_section_footer();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Goodbye Message
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_goodbye() {
    println!();
    println!(
        "  {} {}",
        "👋".with(colors::AMBER),
        "See you at the next event!".with(colors::CORAL).bold()
    );
    println!();
}
