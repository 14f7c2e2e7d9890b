use demophin::ParsedSentence;
use demophin::ace::GenerateResponse;
use demophin::dmrs::{Dmrs, DmrsNode};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_parse(parsed: &ParsedSentence, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{}\"", parsed.sentence), ansi::CYAN)));
    print_diagnostics(&parsed.notes, &parsed.warnings, &parsed.errors, &palette);

    if parsed.results.is_empty() {
        println!("\n{}", palette.dim("  No readings"));
    }
    for (idx, dmrs) in parsed.results.iter().enumerate() {
        println!("\n{}", palette.paint(format!("━━━ Reading {} ━━━", idx + 1), ansi::GRAY));
        print_dmrs(dmrs, &palette);
    }
    println!();
}

/// Report for graphs read directly from SimpleMRS.
pub fn print_graphs(graphs: &[Dmrs], color: bool) {
    let palette = ansi::Palette::new(color);
    for (idx, dmrs) in graphs.iter().enumerate() {
        println!("\n{}", palette.paint(format!("━━━ Graph {} ━━━", idx + 1), ansi::GRAY));
        print_dmrs(dmrs, &palette);
    }
    println!();
}

pub fn print_generation(response: &GenerateResponse, color: bool) {
    let palette = ansi::Palette::new(color);
    print_diagnostics(&response.notes, &response.warnings, &response.errors, &palette);

    println!("\n{}", palette.paint("━━━ Realizations ━━━", ansi::GRAY));
    if response.results.is_empty() {
        println!("{}", palette.dim("  Nothing generated"));
    }
    for (idx, sentence) in response.results.iter().enumerate() {
        println!(
            "  {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            palette.bold(palette.paint(sentence, ansi::GREEN))
        );
    }
    println!();
}

fn print_diagnostics(notes: &[String], warnings: &[String], errors: &[String], palette: &ansi::Palette) {
    if notes.is_empty() && warnings.is_empty() && errors.is_empty() {
        return;
    }
    println!("\n{}", palette.paint("━━━ Engine ━━━", ansi::GRAY));
    for note in notes {
        println!("  {} {}", palette.dim("note:"), palette.dim(note));
    }
    for warning in warnings {
        println!("  {} {}", palette.paint("warning:", ansi::YELLOW), warning);
    }
    for error in errors {
        println!("  {} {}", palette.paint("error:", ansi::RED), error);
    }
}

fn print_dmrs(dmrs: &Dmrs, palette: &ansi::Palette) {
    println!("  {}", palette.bold("Nodes"));
    for node in &dmrs.nodes {
        println!("    {}", fmt_node(node, palette));
    }

    println!("  {}", palette.bold("Links"));
    if dmrs.links.is_empty() {
        println!("    {}", palette.dim("none"));
    }
    for link in &dmrs.links {
        let label = if link.rargname.is_empty() {
            format!("/{}", link.post)
        } else {
            format!("{}/{}", link.rargname, link.post)
        };
        println!(
            "    {} {} {}  {}",
            palette.paint(node_name(dmrs, link.start), ansi::BLUE),
            palette.dim("→"),
            palette.paint(node_name(dmrs, link.end), ansi::BLUE),
            palette.paint(label, ansi::YELLOW),
        );
    }
}

fn fmt_node(node: &DmrsNode, palette: &ansi::Palette) -> String {
    let span = if node.cfrom < 0 { "<?>".to_string() } else { format!("<{}:{}>", node.cfrom, node.cto) };
    format!(
        "{} {} {} {}",
        palette.paint(node.id.to_string(), ansi::GRAY),
        palette.paint(&node.pred, ansi::GREEN),
        palette.paint(span, ansi::YELLOW),
        palette.dim(node.cvarsort.as_deref().unwrap_or("-")),
    )
}

fn node_name(dmrs: &Dmrs, id: u32) -> String {
    if id == demophin::dmrs::TOP_NODE_ID {
        return "TOP".to_string();
    }
    match dmrs.nodes.iter().find(|n| n.id == id) {
        Some(node) => format!("{}:{}", node.id, node.pred),
        None => id.to_string(),
    }
}
