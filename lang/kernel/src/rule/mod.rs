use printer::theme::ThemeExt;
use printer::tokens::{BACKSLASH, COMMA, DOT, FAT_ARROW, UNDERSCORE};
use printer::util::ParensExt;
use pretty::DocAllocator;

use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use ast::*;

use crate::result::KernelError;
use crate::signature::Signature;

mod prematch;

pub(crate) use prematch::match_rule;

// Pattern
//
//

/// The left-hand-side pattern language.
///
/// A pattern variable is always applied in Miller form: its arguments are a
/// tuple of distinct bound variables, given as de Bruijn indices relative to
/// the pattern position. The members of a multiset under an AC symbol must
/// be pattern variables or jokers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A pattern variable (by position in the rule context) applied to bound
    /// variables.
    MVar { var: usize, args: Vec<usize> },
    Symb { name: Constant, args: Vec<Pattern> },
    Lambda { param: VarBind, body: Box<Pattern> },
    /// Anonymous wildcard.
    Joker,
}

impl Pattern {
    pub fn var(var: usize) -> Pattern {
        Pattern::MVar { var, args: Vec::new() }
    }

    pub fn symb(name: &str, args: Vec<Pattern>) -> Pattern {
        Pattern::Symb { name: Constant::from_string(name), args }
    }

    pub fn lambda(param: &str, body: Pattern) -> Pattern {
        Pattern::Lambda { param: VarBind::from_string(param), body: Box::new(body) }
    }
}

// Rule
//
//

/// A rewrite rule `head args ⟶ rhs` with `ctx.len()` pattern variables.
///
/// In the right-hand side, pattern variable `i` is the de Bruijn index `i`
/// at the rule root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: Option<String>,
    pub ctx: Vec<VarBind>,
    pub head: Constant,
    pub args: Vec<Pattern>,
    pub rhs: Term,
}

impl Rule {
    /// The number of arguments the head symbol must be applied to before
    /// this rule can fire.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The number of Miller arguments of each pattern variable, taken from
    /// its first occurrence. [`Rule::check`] guarantees all occurrences
    /// agree.
    pub fn arities(&self) -> Vec<usize> {
        let mut arities = vec![0; self.ctx.len()];
        let mut seen = vec![false; self.ctx.len()];
        fn walk(pat: &Pattern, arities: &mut [usize], seen: &mut [bool]) {
            match pat {
                Pattern::Joker => {}
                Pattern::MVar { var, args } => {
                    if let Some(slot) = seen.get_mut(*var) {
                        if !*slot {
                            *slot = true;
                            arities[*var] = args.len();
                        }
                    }
                }
                Pattern::Symb { args, .. } => args.iter().for_each(|p| walk(p, arities, seen)),
                Pattern::Lambda { body, .. } => walk(body, arities, seen),
            }
        }
        self.args.iter().for_each(|p| walk(p, &mut arities, &mut seen));
        arities
    }

    /// Check well-formedness of the left-hand side: pattern variables in
    /// scope and in Miller form, consistent arities, AC multiset members
    /// restricted to variables and jokers, and no unused rule variable.
    pub(crate) fn check(&self, sg: &Signature) -> Result<(), KernelError> {
        let mut arities: Vec<Option<usize>> = vec![None; self.ctx.len()];
        for pat in &self.args {
            self.check_pattern(sg, pat, 0, &mut arities)?;
        }
        for (var, arity) in arities.iter().enumerate() {
            if arity.is_none() {
                return Err(KernelError::UnusedRuleVariable { var: self.ctx[var].id.clone() });
            }
        }
        Ok(())
    }

    fn check_pattern(
        &self,
        sg: &Signature,
        pat: &Pattern,
        depth: usize,
        arities: &mut [Option<usize>],
    ) -> Result<(), KernelError> {
        match pat {
            Pattern::Joker => Ok(()),
            Pattern::MVar { var, args } => {
                if *var >= self.ctx.len() {
                    return Err(KernelError::UnboundRuleVariable {
                        index: *var,
                        bound: self.ctx.len(),
                    });
                }
                let name = &self.ctx[*var].id;
                let distinct =
                    args.iter().all(|a| args.iter().filter(|b| *b == a).count() == 1);
                if !distinct || args.iter().any(|a| *a >= depth) {
                    return Err(KernelError::NonMillerPattern { var: name.clone() });
                }
                match arities[*var] {
                    None => arities[*var] = Some(args.len()),
                    Some(expected) if expected != args.len() => {
                        return Err(KernelError::ArityMismatch {
                            var: name.clone(),
                            expected,
                            actual: args.len(),
                        });
                    }
                    Some(_) => {}
                }
                Ok(())
            }
            Pattern::Lambda { body, .. } => self.check_pattern(sg, body, depth + 1, arities),
            Pattern::Symb { name, args } => {
                if args.len() == 2 && sg.ac_ident(name).is_some() {
                    self.check_ac_member(sg, name, &args[0], depth, arities)?;
                    self.check_ac_member(sg, name, &args[1], depth, arities)
                } else {
                    args.iter()
                        .try_for_each(|arg| self.check_pattern(sg, arg, depth, arities))
                }
            }
        }
    }

    fn check_ac_member(
        &self,
        sg: &Signature,
        symbol: &Constant,
        pat: &Pattern,
        depth: usize,
        arities: &mut [Option<usize>],
    ) -> Result<(), KernelError> {
        match pat {
            Pattern::Joker => Ok(()),
            Pattern::MVar { .. } => self.check_pattern(sg, pat, depth, arities),
            Pattern::Symb { name, args } if name == symbol && args.len() == 2 => {
                self.check_ac_member(sg, symbol, &args[0], depth, arities)?;
                self.check_ac_member(sg, symbol, &args[1], depth, arities)
            }
            _ => Err(KernelError::AcPatternMember { symbol: symbol.id.clone() }),
        }
    }
}

// Prettyprinting
//
//

impl Print for Pattern {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Pattern::Joker => alloc.text(UNDERSCORE),
            Pattern::MVar { var, args } => {
                let head = alloc.var(&format!("?{var}"));
                if args.is_empty() {
                    head
                } else {
                    let args = args.iter().map(|a| alloc.text(a.to_string()));
                    head.append(
                        alloc
                            .intersperse(args, alloc.text(COMMA).append(alloc.space()))
                            .enclose("[", "]"),
                    )
                }
            }
            Pattern::Symb { name, args } => {
                if args.is_empty() {
                    name.print(cfg, alloc)
                } else {
                    let args = args.iter().map(|a| a.print_prec(cfg, alloc, Precedence::Atom));
                    name.print(cfg, alloc)
                        .append(alloc.space())
                        .append(alloc.intersperse(args, alloc.space()))
                        .parens_if(prec == Precedence::Atom)
                }
            }
            Pattern::Lambda { param, body } => alloc
                .text(BACKSLASH)
                .append(alloc.text(param.id.clone()))
                .append(DOT)
                .append(alloc.space())
                .append(body.print(cfg, alloc))
                .parens_if(prec > Precedence::Exp),
        }
    }
}

impl Print for Rule {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let Rule { name, head, args, rhs, .. } = self;
        let label = match name {
            Some(name) => alloc.comment(&format!("{name}: ")),
            None => alloc.nil(),
        };
        let args = args.iter().map(|a| a.print_prec(cfg, alloc, Precedence::Atom));
        label
            .append(head.print(cfg, alloc))
            .append(alloc.space())
            .append(alloc.intersperse(args, alloc.space()))
            .append(alloc.space())
            .append(FAT_ARROW)
            .append(alloc.space())
            .append(rhs.print(cfg, alloc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(ctx: &[&str], args: Vec<Pattern>) -> Rule {
        Rule {
            name: None,
            ctx: ctx.iter().map(|x| VarBind::from_string(x)).collect(),
            head: Constant::from_string("f"),
            args,
            rhs: Term::var("X", 0),
        }
    }

    #[test]
    fn miller_args_must_be_distinct() {
        let sg = Signature::new();
        let r = rule(
            &["X"],
            vec![Pattern::lambda(
                "x",
                Pattern::lambda("y", Pattern::MVar { var: 0, args: vec![0, 0] }),
            )],
        );
        assert_eq!(r.check(&sg), Err(KernelError::NonMillerPattern { var: "X".to_owned() }));
    }

    #[test]
    fn miller_args_must_be_bound() {
        let sg = Signature::new();
        let r = rule(&["X"], vec![Pattern::MVar { var: 0, args: vec![0] }]);
        assert_eq!(r.check(&sg), Err(KernelError::NonMillerPattern { var: "X".to_owned() }));
    }

    #[test]
    fn occurrence_arities_must_agree() {
        let sg = Signature::new();
        let r = rule(
            &["X"],
            vec![
                Pattern::lambda("x", Pattern::MVar { var: 0, args: vec![0] }),
                Pattern::var(0),
            ],
        );
        assert_eq!(
            r.check(&sg),
            Err(KernelError::ArityMismatch { var: "X".to_owned(), expected: 1, actual: 0 })
        );
    }

    #[test]
    fn ac_members_must_be_flexible() {
        let mut sg = Signature::new();
        sg.declare_ac(Constant::from_string("plus")).unwrap();
        let r = rule(
            &["X"],
            vec![Pattern::symb(
                "plus",
                vec![Pattern::var(0), Pattern::symb("s", vec![Pattern::Joker])],
            )],
        );
        assert_eq!(r.check(&sg), Err(KernelError::AcPatternMember { symbol: "plus".to_owned() }));
    }

    #[test]
    fn unused_variables_are_rejected() {
        let sg = Signature::new();
        let r = rule(&["X", "Y"], vec![Pattern::var(0)]);
        assert_eq!(r.check(&sg), Err(KernelError::UnusedRuleVariable { var: "Y".to_owned() }));
    }

    #[test]
    fn nested_ac_pattern_is_accepted() {
        let mut sg = Signature::new();
        sg.declare_ac(Constant::from_string("plus")).unwrap();
        let r = rule(
            &["X", "Y"],
            vec![Pattern::symb(
                "plus",
                vec![
                    Pattern::symb("plus", vec![Pattern::var(0), Pattern::var(1)]),
                    Pattern::Joker,
                ],
            )],
        );
        assert_eq!(r.check(&sg), Ok(()));
        assert_eq!(r.arities(), vec![0, 0]);
    }
}
