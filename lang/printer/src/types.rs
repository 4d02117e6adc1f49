use std::io;

use pretty::DocAllocator;
use pretty::termcolor::{Color, ColorSpec, WriteColor};

use crate::tokens::INDENT;
use crate::DEFAULT_WIDTH;

pub type Alloc<'a> = pretty::Arena<'a, Anno>;
pub type Builder<'a> = pretty::DocBuilder<'a, Alloc<'a>, Anno>;

/// Semantic annotations emitted by the printers.
///
/// The renderers decide how an annotation is displayed; the plain renderer
/// ignores them altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anno {
    Keyword,
    Ctor,
    Var,
    Comment,
    Error,
}

impl Anno {
    pub fn color_spec(&self) -> ColorSpec {
        let color = match self {
            Anno::Keyword => Color::Magenta,
            Anno::Ctor => Color::Blue,
            Anno::Var => Color::Green,
            Anno::Comment => Color::Cyan,
            Anno::Error => Color::Red,
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color));
        spec
    }
}

/// Streams a document to a `termcolor` writer.
///
/// Annotations nest, and the innermost one wins: entering or leaving an
/// annotated region re-applies the colour now on top of the stack, or resets
/// the writer once the stack runs empty. The specs are computed when an
/// annotation is entered so leaving one never has to look at [`Anno`] again.
pub struct ColorWriter<W> {
    colors: Vec<ColorSpec>,
    out: W,
}

impl<W: WriteColor> ColorWriter<W> {
    pub fn new(out: W) -> Self {
        ColorWriter { colors: Vec::new(), out }
    }

    fn refresh(&mut self) -> io::Result<()> {
        match self.colors.last() {
            Some(spec) => self.out.set_color(spec),
            None => self.out.reset(),
        }
    }
}

impl<W: io::Write> pretty::Render for ColorWriter<W> {
    type Error = io::Error;

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.write_str_all(s).map(|()| s.len())
    }

    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }

    fn fail_doc(&self) -> Self::Error {
        io::Error::other("document rendering failed")
    }
}

impl<W: WriteColor> pretty::RenderAnnotated<'_, Anno> for ColorWriter<W> {
    fn push_annotation(&mut self, anno: &Anno) -> Result<(), Self::Error> {
        self.colors.push(anno.color_spec());
        self.refresh()
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        self.colors.pop();
        self.refresh()
    }
}

#[derive(Debug, Clone)]
pub struct PrintCfg {
    pub width: usize,
    pub indent: isize,
    /// Display variables as `name@idx` instead of just their name.
    pub de_bruijn: bool,
}

impl Default for PrintCfg {
    fn default() -> Self {
        PrintCfg { width: DEFAULT_WIDTH, indent: INDENT, de_bruijn: false }
    }
}

/// Binding strength of the context a subexpression is printed in.
/// Used to decide where parentheses are necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Weakest: binders and arrows may appear bare.
    Exp,
    /// Argument position of an application.
    App,
    /// Strongest: only atoms may appear bare.
    Atom,
}

pub trait Print {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.print_prec(cfg, alloc, Precedence::Exp)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.print(cfg, alloc)
    }

    fn print_to_string(&self, cfg: Option<&PrintCfg>) -> String {
        let alloc = Alloc::new();
        let default_cfg = PrintCfg::default();
        let cfg = cfg.unwrap_or(&default_cfg);
        let mut buf = Vec::new();
        let doc_builder = self.print(cfg, &alloc);
        doc_builder.1.render(cfg.width, &mut buf).expect("Failed to print to string");
        String::from_utf8(buf).expect("Failed to print to string")
    }

    fn print_colored<W: WriteColor>(&self, cfg: Option<&PrintCfg>, out: W) -> io::Result<()> {
        let alloc = Alloc::new();
        let default_cfg = PrintCfg::default();
        let cfg = cfg.unwrap_or(&default_cfg);
        let doc_builder = self.print(cfg, &alloc);
        doc_builder.1.render_raw(cfg.width, &mut ColorWriter::new(out))
    }

    /// One-line rendering for `log` tracing.
    fn print_trace(&self) -> String {
        self.print_to_string(Some(&PrintCfg { width: 1 << 20, ..PrintCfg::default() }))
    }
}

impl<T: Print> Print for Box<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        (**self).print(cfg, alloc)
    }

    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        (**self).print_prec(cfg, alloc, prec)
    }
}

impl<T: Print> Print for Option<T> {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Some(inner) => inner.print(cfg, alloc),
            None => alloc.nil(),
        }
    }
}
