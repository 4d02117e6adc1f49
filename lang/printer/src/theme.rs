use pretty::DocAllocator;

use super::types::*;

/// Allocate a piece of text tagged with its semantic role.
///
/// Only [`ThemeExt::tagged`] needs an implementation; the named shorthands
/// exist so that printers read as `alloc.keyword(..)` rather than repeating
/// the [`Anno`] variant at every call site.
pub trait ThemeExt<'a> {
    fn tagged(&'a self, anno: Anno, text: &str) -> Builder<'a>;

    fn keyword(&'a self, text: &str) -> Builder<'a> {
        self.tagged(Anno::Keyword, text)
    }

    fn ctor(&'a self, text: &str) -> Builder<'a> {
        self.tagged(Anno::Ctor, text)
    }

    fn var(&'a self, text: &str) -> Builder<'a> {
        self.tagged(Anno::Var, text)
    }

    fn comment(&'a self, text: &str) -> Builder<'a> {
        self.tagged(Anno::Comment, text)
    }
}

impl<'a> ThemeExt<'a> for Alloc<'a> {
    fn tagged(&'a self, anno: Anno, text: &str) -> Builder<'a> {
        self.text(text.to_owned()).annotate(anno)
    }
}
