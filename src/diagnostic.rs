use owo_colors::OwoColorize;

/// A byte range in the source plus the 1-based line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0, line: 0 }
    }

    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

/// A label pointing to a specific span in the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// An error message with its source labels and trailing notes.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Dummy spans carry no location, so they are dropped here.
    pub fn with_label(mut self, label: Label) -> Self {
        if !label.span.is_dummy() {
            self.labels.push(label);
        }
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes line and column from a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_content(source: &str, line_num: usize) -> Option<&str> {
    source
        .split('\n')
        .nth(line_num.checked_sub(1)?)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Diagnostic renderer for rustc-like error output
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        self.render_header(&mut output, diagnostic);

        if let Some(label) = diagnostic.labels.first() {
            let (_, col) = line_col(self.source, label.span.start);
            let gutter = " ".repeat(label.span.line.to_string().len() + 1);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.blue("-->"),
                self.file_name,
                label.span.line,
                col
            ));
            output.push_str(&format!("{} {}\n", gutter, self.blue("|")));
            for label in &diagnostic.labels {
                self.render_label(&mut output, label, &gutter);
            }
            output.push_str(&format!("{} {}\n", gutter, self.blue("|")));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.blue("="), note));
        }

        output
    }

    fn render_header(&self, output: &mut String, diagnostic: &Diagnostic) {
        let severity = self.red_bold("error");
        match &diagnostic.code {
            Some(code) => output.push_str(&format!(
                "{}[{}]: {}\n",
                severity,
                code,
                self.bold(&diagnostic.message)
            )),
            None => output.push_str(&format!("{}: {}\n", severity, self.bold(&diagnostic.message))),
        }
    }

    fn render_label(&self, output: &mut String, label: &Label, gutter: &str) {
        let Some(content) = line_content(self.source, label.span.line) else {
            return;
        };
        output.push_str(&format!(
            "{:>width$} {} {}\n",
            self.blue(&label.span.line.to_string()),
            self.blue("|"),
            content,
            width = gutter.len()
        ));

        let (_, start_col) = line_col(self.source, label.span.start);
        let (end_line, end_col) = line_col(self.source, label.span.end.max(label.span.start + 1));
        let last_col = if end_line == label.span.line {
            end_col
        } else {
            content.chars().count() + 1
        };
        let width = last_col.saturating_sub(start_col).max(1);

        let mut underline = " ".repeat(start_col.saturating_sub(1));
        underline.push_str(&"^".repeat(width));
        if !label.message.is_empty() {
            underline.push(' ');
            underline.push_str(&label.message);
        }
        output.push_str(&format!("{} {} {}\n", gutter, self.blue("|"), self.red(&underline)));
    }

    fn red(&self, s: &str) -> String {
        if self.use_color {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn red_bold(&self, s: &str) -> String {
        if self.use_color {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn blue(&self, s: &str) -> String {
        if self.use_color {
            s.blue().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.use_color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

/// Render multiple diagnostics followed by an abort summary
pub fn render_diagnostics(source: &str, file_name: &str, diagnostics: &[Diagnostic], use_color: bool) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let error_count = diagnostics.len();
    if error_count > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    output
}
