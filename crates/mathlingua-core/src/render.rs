//! Source-like rendering of the typed tree, used by golden tests.
//!
//! The output re-parses to a structurally equal tree: sections sit at
//! their group's column, arguments follow on `. ` lines at the same column,
//! and nested groups open on their argument line.

use std::fmt::Write as _;

use crate::walk::{FormulationView, Node, NodeView, children};

/// Replaces the text of parsed formulation literals when rendering.
pub type FormulationOverride<'f> = &'f dyn Fn(&FormulationView<'_>) -> String;

/// Renders `node` and its descendants.
///
/// Formulation literals are printed verbatim unless `formulation_override`
/// is given, in which case it is called for every literal that parsed.
///
/// # Examples
///
/// ```
/// use mathlingua_core::{
///     ast::{Section, TextItem},
///     render::debug_render,
///     span::Position,
/// };
///
/// let section = Section::new(
///     "written",
///     Position::default(),
///     vec![TextItem::new("x", Position::default())],
/// );
/// assert_eq!(debug_render(&section, None), "written:\n. \"x\"\n");
/// ```
pub fn debug_render(node: &dyn Node, formulation_override: Option<FormulationOverride<'_>>) -> String {
    let mut renderer = Renderer {
        out: String::new(),
        formulation_override,
    };
    renderer.node(node);
    renderer.out
}

struct Renderer<'f> {
    out: String,
    formulation_override: Option<FormulationOverride<'f>>,
}

impl Renderer<'_> {
    fn node(&mut self, node: &dyn Node) {
        match node.view() {
            NodeView::Document => {
                for (index, item) in children(node).into_iter().enumerate() {
                    if index > 0 {
                        self.out.push('\n');
                    }
                    self.node(item);
                }
            }
            NodeView::Group { id, .. } => {
                if let Some(id) = id {
                    let id = self.formulation_text(&id);
                    let _ = writeln!(self.out, "[{id}]");
                }
                self.sections(node, 0, false);
            }
            NodeView::Section { name } => self.section(node, name, 0, ""),
            NodeView::Text(_) | NodeView::TextBlock(_) | NodeView::Formulation(_) => {
                let literal = self.literal(node);
                self.out.push_str(&literal);
                self.out.push('\n');
            }
        }
    }

    /// Writes every section of a group whose section names sit at `column`.
    ///
    /// With `bullet`, the first section shares the `. ` line of the argument
    /// that holds the group.
    fn sections(&mut self, group: &dyn Node, column: usize, bullet: bool) {
        for (index, section) in children(group).into_iter().enumerate() {
            if let NodeView::Section { name } = section.view() {
                if index == 0 && bullet {
                    self.section(section, name, column - 2, ". ");
                } else {
                    self.section(section, name, column, "");
                }
            }
        }
    }

    fn section(&mut self, section: &dyn Node, name: &str, indent: usize, prefix: &str) {
        let column = indent + prefix.len();
        let _ = writeln!(self.out, "{:indent$}{prefix}{name}:", "");
        for arg in children(section) {
            match arg.view() {
                NodeView::Group { .. } => self.sections(arg, column + 2, true),
                _ => {
                    let literal = self.literal(arg);
                    let _ = writeln!(self.out, "{:column$}. {literal}", "");
                }
            }
        }
    }

    fn literal(&self, node: &dyn Node) -> String {
        match node.view() {
            NodeView::Text(raw) => format!("\"{raw}\""),
            NodeView::TextBlock(text) => format!("::{text}::"),
            NodeView::Formulation(view) => format!("`{}`", self.formulation_text(&view)),
            NodeView::Document | NodeView::Group { .. } | NodeView::Section { .. } => String::new(),
        }
    }

    fn formulation_text(&self, view: &FormulationView<'_>) -> String {
        match (self.formulation_override, view.root) {
            (Some(render), Some(_)) => render(view),
            _ => view.raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{
            Clause, Document, ForAllGroup, Formulation, IdItem, MetaData, NoId, Section, Target,
            TextBlockItem, TextItem, TheoremGroup, TopLevelItem,
        },
        span::Position,
    };

    fn formulation(raw: &str) -> Formulation {
        Formulation::new(raw, None, Position::default())
    }

    fn theorem() -> TheoremGroup {
        let at = Position::default();
        let for_all = ForAllGroup {
            meta: MetaData::at(at),
            id: NoId,
            for_all: Section::new("forAll", at, vec![Target::new("x", None, at)]),
            r#where: None,
            such_that: None,
            then: Section::new("then", at, vec![Clause::from(formulation("x = x"))]),
        };
        TheoremGroup {
            meta: MetaData::at(at),
            id: Some(IdItem::new("\\reflexive", None, at)),
            theorem: Section::new("Theorem", at, vec![TextItem::new("Reflexivity", at)]),
            given: None,
            r#where: None,
            r#if: None,
            iff: None,
            then: Section::new("then", at, vec![Clause::from(for_all)]),
            proof: None,
            documented: None,
            references: None,
            aliases: None,
            metadata_id: None,
        }
    }

    #[test]
    fn test_render_nested_group() {
        let rendered = debug_render(&theorem(), None);
        assert_eq!(
            rendered,
            "[\\reflexive]\n\
             Theorem:\n\
             . \"Reflexivity\"\n\
             then:\n\
             . forAll:\n\
             \x20 . `x`\n\
             \x20 then:\n\
             \x20 . `x = x`\n"
        );
    }

    #[test]
    fn test_render_document_separates_items() {
        let document = Document::new(vec![
            TopLevelItem::from(TextBlockItem::new(" intro ", Position::default())),
            TopLevelItem::from(theorem()),
        ]);
        let rendered = debug_render(&document, None);
        assert!(rendered.starts_with(":: intro ::\n\n[\\reflexive]\n"));
    }

    #[test]
    fn test_override_only_applies_to_parsed_literals() {
        let section = Section::new(
            "then",
            Position::default(),
            vec![
                Formulation::new(
                    "a+b",
                    Some(crate::ast::Expression::Name {
                        name: "ab".to_string(),
                        start: Position::default(),
                    }),
                    Position::default(),
                ),
                formulation("broken +"),
            ],
        );
        let shout = |view: &FormulationView<'_>| view.raw.to_uppercase();
        let rendered = debug_render(&section, Some(&shout));
        assert_eq!(rendered, "then:\n. `A+B`\n. `broken +`\n");
    }
}
