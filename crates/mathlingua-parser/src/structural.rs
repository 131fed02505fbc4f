//! Phase 5: the untyped group tree to a typed [`Document`].
//!
//! Every group kind except `piecewise` is matched by one data-driven loop
//! over its [`Schema`]:
//!
//! 1. Sections are matched to schema slots by searching forward from the
//!    last matched slot. Optional slots that are skipped stay empty.
//! 2. A section that matches no remaining slot is reported as unexpected,
//!    or as a duplicate when an earlier section already used its name.
//! 3. Each required slot left empty is reported at the group start and
//!    filled with an empty section.
//!
//! The typed group is then assembled field by field from a `SlotCursor`,
//! which checks each section's cardinality and converts its arguments.
//! Formulation literals are handed to the [`formulation`](crate::formulation)
//! parser with their absolute offsets.

use indexmap::IndexMap;
use log::{debug, trace};

use mathlingua_core::{
    ast::{
        Alias, AllOfGroup, AnyOfGroup, Assemble, AuthorGroup, AxiomGroup, BiographyGroup, ByGroup,
        CalledGroup, Clause, ConjectureGroup, ConnectionGroup, DefinesGroup, DescribesGroup,
        DescribingGroup, DescriptionGroup, DiscovererGroup, Document, DocumentedItem,
        EditionGroup, EditorGroup, ExampleGroup, ExistsGroup, ExistsUniqueGroup, Expression,
        Fill, ForAllGroup, Formulation, GivenGroup, HistoryGroup, HomepageGroup, IdItem,
        IfGroup, IfThen, IffGroup, InstitutionGroup, JournalGroup, JustifiedItem, LabelGroup,
        MetaData, MonthGroup, MotivationGroup, NameGroup, NegativeFloatGroup,
        NegativeIntGroup, NoArgument, NoId, NotGroup, NoteGroup, NoteItem, OffsetGroup,
        OneOfGroup, OverviewGroup, PersonGroup, PersonItem, PiecewiseGroup,
        PositiveFloatGroup, PositiveIntGroup, ProvidesItem, PublisherGroup, RelatedGroup,
        ResourceGroup, ResourceItem, Section, SectionItem, SignatureItem, Spec, SpecifyGroup,
        SpecifyItem,
        StatesGroup, SymbolWrittenGroup, Target, TextBlockItem, TextItem, TheoremGroup,
        TitleGroup, TopLevelItem, TopicGroup, TypeGroup, UrlGroup, VolumeGroup, WhenGroup,
        WritingGroup, WrittenGroup, YearGroup, ZeroGroup,
    },
    schema::{
        ArgKind, Cardinality, GroupKind, IdRule, Schema, SectionSpec, TOP_LEVEL_GROUPS, dispatch,
        proof_kinds,
    },
    span::{Position, Span},
};

use crate::{
    error::{Diagnostic, DiagnosticTracker, ErrorCode, Origin},
    formulation,
    group_tree::{self, Argument, Group, Literal, Payload, Root, TopLevelNode},
};

fn position(diagnostics: &DiagnosticTracker<'_>, offset: usize) -> Position {
    diagnostics.positions().position_of(offset)
}

fn error(code: ErrorCode, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(Origin::Phase5Parser, message).with_code(code)
}

fn wrong_kind(
    argument: &Argument<'_>,
    expected: ArgKind,
    diagnostics: &mut DiagnosticTracker<'_>,
) {
    diagnostics.append(
        error(
            ErrorCode::E404,
            format!(
                "Expected {}, found {}",
                expected.describe(),
                argument.payload.describe()
            ),
        )
        .with_label(argument.span, ErrorCode::E404.description()),
    );
}

/// Matches `group`'s sections to the slots of `schema`.
fn match_sections<'g>(
    schema: &Schema,
    group: &'g Group<'g>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Vec<Option<&'g group_tree::Section<'g>>> {
    let mut matched = vec![None; schema.sections.len()];
    let mut seen: IndexMap<&str, Span> = IndexMap::new();
    let mut next = 0;

    for section in &group.sections {
        if let Some(first) = seen.get(section.name) {
            diagnostics.append(
                error(
                    ErrorCode::E402,
                    format!("Duplicate section '{}'", section.name),
                )
                .with_label(section.name_span, "duplicate section")
                .with_secondary_label(*first, "first used here"),
            );
            continue;
        }

        let found = schema.sections[next..]
            .iter()
            .position(|spec| spec.name == section.name);
        match found {
            Some(index) => {
                let slot = next + index;
                matched[slot] = Some(section);
                next = slot + 1;
                seen.insert(section.name, section.name_span);
            }
            None => {
                let mut diagnostic = error(
                    ErrorCode::E401,
                    format!("Unexpected section '{}'", section.name),
                )
                .with_label(section.name_span, ErrorCode::E401.description());
                if schema.names().any(|name| name == section.name) {
                    let order: Vec<_> = schema.names().collect();
                    diagnostic = diagnostic.with_help(format!(
                        "sections of '{}' must appear in the order: {}",
                        schema.head(),
                        order.join(", ")
                    ));
                }
                diagnostics.append(diagnostic);
            }
        }
    }

    for (spec, slot) in schema.sections.iter().zip(&matched) {
        if spec.required && slot.is_none() {
            diagnostics.append(
                error(
                    ErrorCode::E400,
                    format!("Expected section '{}'", spec.name),
                )
                .with_label(Span::point(group.start()), format!("'{}' starts here", schema.head())),
            );
        }
    }

    matched
}

/// Checks the argument count of `section` against `spec`.
fn cardinality_holds(
    spec: &SectionSpec,
    section: &group_tree::Section<'_>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> bool {
    let count = section.args.len();
    let message = match spec.cardinality {
        Cardinality::None if count > 0 => {
            format!("Expected no arguments for section '{}'", spec.name)
        }
        Cardinality::ExactlyOne if count != 1 => format!(
            "Expected exactly one item for section '{}', found {count}",
            spec.name
        ),
        Cardinality::OneOrMore if count == 0 => {
            format!("Expected at least one item for section '{}'", spec.name)
        }
        _ => return true,
    };
    diagnostics.append(
        error(ErrorCode::E403, message).with_label(section.name_span, ErrorCode::E403.description()),
    );
    false
}

/// Converts a matched section, leaving its items empty when the argument
/// count is wrong.
fn convert_section<T: FromArgument>(
    spec: &SectionSpec,
    section: &group_tree::Section<'_>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Section<T> {
    debug_assert_eq!(T::ARG, spec.arg, "section '{}' holds the wrong item type", spec.name);
    let start = position(diagnostics, section.name_span.start());
    if !cardinality_holds(spec, section, diagnostics) {
        return Section::missing(spec.name, start);
    }
    let items = section
        .args
        .iter()
        .filter_map(|argument| T::from_argument(argument, spec.arg, diagnostics))
        .collect();
    Section::new(spec.name, start, items)
}

/// Hands out the matched sections of one group in schema order.
struct SlotCursor<'c, 'd> {
    diagnostics: &'c mut DiagnosticTracker<'d>,
    group: &'c Group<'c>,
    head: &'static str,
    id_rule: IdRule,
    slots: std::vec::IntoIter<(&'static SectionSpec, Option<&'c group_tree::Section<'c>>)>,
}

impl<'c> SlotCursor<'c, '_> {
    fn group_start(&self) -> Position {
        position(self.diagnostics, self.group.start())
    }

    fn missing_id(&mut self) {
        let diagnostic = error(
            ErrorCode::E405,
            format!("Expected an id for '{}'", self.head),
        )
        .with_label(Span::point(self.group.start()), ErrorCode::E405.description())
        .with_help(format!("write the id above the group, as in [\\name]\n{}:", self.head));
        self.diagnostics.append(diagnostic);
    }

    /// The group's id literal, reporting its absence when the schema
    /// requires one.
    fn id_literal(&mut self) -> Option<Literal<'c>> {
        if self.group.id.is_none() && self.id_rule.is_required() {
            self.missing_id();
        }
        self.group.id
    }

    fn formulation_id(&mut self) -> Option<IdItem> {
        let literal = self.id_literal()?;
        let root = formulation::parse_id(literal.text, literal.start, self.diagnostics);
        Some(IdItem::new(
            literal.text,
            root,
            position(self.diagnostics, literal.span.start()),
        ))
    }
}

impl<'c, 'd, T: FromArgument> Fill<SlotCursor<'c, 'd>> for Section<T> {
    fn fill(cursor: &mut SlotCursor<'c, 'd>) -> Self {
        let start = cursor.group_start();
        match cursor.slots.next() {
            Some((spec, Some(section))) => convert_section(spec, section, cursor.diagnostics),
            Some((spec, None)) => Section::missing(spec.name, start),
            None => Section::missing(cursor.head, start),
        }
    }
}

impl<'c, 'd, T: FromArgument> Fill<SlotCursor<'c, 'd>> for Option<Section<T>> {
    fn fill(cursor: &mut SlotCursor<'c, 'd>) -> Self {
        match cursor.slots.next() {
            Some((spec, Some(section))) => {
                Some(convert_section(spec, section, cursor.diagnostics))
            }
            _ => None,
        }
    }
}

impl Fill<SlotCursor<'_, '_>> for NoId {
    fn fill(_cursor: &mut SlotCursor<'_, '_>) -> Self {
        NoId
    }
}

impl Fill<SlotCursor<'_, '_>> for IdItem {
    fn fill(cursor: &mut SlotCursor<'_, '_>) -> Self {
        match cursor.formulation_id() {
            Some(id) => id,
            None => IdItem::new("", None, cursor.group_start()),
        }
    }
}

impl Fill<SlotCursor<'_, '_>> for Option<IdItem> {
    fn fill(cursor: &mut SlotCursor<'_, '_>) -> Self {
        cursor.formulation_id()
    }
}

/// Opaque ids are kept verbatim.
impl Fill<SlotCursor<'_, '_>> for String {
    fn fill(cursor: &mut SlotCursor<'_, '_>) -> Self {
        cursor
            .id_literal()
            .map(|literal| literal.text.to_string())
            .unwrap_or_default()
    }
}

/// Assembles a schema-driven group of `kind`.
///
/// Always produces the group; defaults stand in for anything missing.
fn assemble<'c, 'd, G>(
    kind: GroupKind,
    group: &'c Group<'c>,
    diagnostics: &'c mut DiagnosticTracker<'d>,
) -> Option<G>
where
    G: Assemble<SlotCursor<'c, 'd>>,
{
    let schema = kind.schema();
    let matched = match_sections(schema, group, diagnostics);
    let meta = MetaData::at(position(diagnostics, group.start()));
    trace!(kind:?, sections = group.sections.len(); "Assembling group");

    let slots: Vec<_> = schema.sections.iter().zip(matched).collect();
    let mut cursor = SlotCursor {
        diagnostics,
        group,
        head: schema.head(),
        id_rule: schema.id,
        slots: slots.into_iter(),
    };
    Some(G::assemble(&mut cursor, meta))
}

fn piecewise_error(at: Span, message: impl Into<String>, diagnostics: &mut DiagnosticTracker<'_>) {
    diagnostics.append(
        error(ErrorCode::E408, message)
            .with_label(at, ErrorCode::E408.description())
            .with_help("write 'if:' and 'then:' in pairs, then at most one 'else:'"),
    );
}

/// Builds a `piecewise:` group: the head, then `if:`/`then:` pairs, then an
/// optional `else:`.
///
/// A broken pair ends the group at the first problem. Every section after
/// `else:` is reported. In both cases no group is produced.
fn piecewise(
    _kind: GroupKind,
    group: &Group<'_>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<PiecewiseGroup> {
    let [head_spec, if_spec, then_spec, else_spec] = GroupKind::Piecewise.schema().sections
    else {
        return None;
    };
    let (head, body) = group.sections.split_first()?;
    let start = position(diagnostics, group.start());
    let piecewise = convert_section(head_spec, head, diagnostics);

    let mut body = body.iter().peekable();
    let mut cases = Vec::new();
    while let Some(condition) = body.next_if(|section| section.name != else_spec.name) {
        if condition.name != if_spec.name {
            let message = format!("Expected section 'if' but found '{}'", condition.name);
            piecewise_error(condition.name_span, message, diagnostics);
            return None;
        }
        let Some(then) = body.next() else {
            let message = "Expected section 'then' to follow an 'if' section";
            piecewise_error(condition.name_span, message, diagnostics);
            return None;
        };
        if then.name != then_spec.name {
            let message = format!("Expected section 'then' but found '{}'", then.name);
            piecewise_error(then.name_span, message, diagnostics);
            return None;
        }
        cases.push(IfThen {
            r#if: convert_section(if_spec, condition, diagnostics),
            then: convert_section(then_spec, then, diagnostics),
        });
    }

    let r#else = body
        .next()
        .map(|section| convert_section(else_spec, section, diagnostics));

    let mut trailing = 0;
    for section in body {
        trailing += 1;
        diagnostics.append(
            error(
                ErrorCode::E401,
                format!("Unexpected section '{}'", section.name),
            )
            .with_label(section.name_span, ErrorCode::E401.description())
            .with_help("'else' must be the last section of 'piecewise'"),
        );
    }
    if trailing > 0 {
        return None;
    }

    Some(PiecewiseGroup {
        meta: MetaData::at(start),
        piecewise,
        cases,
        r#else,
    })
}

/// Finds the kind among `candidates` named by `group`'s head section.
fn resolve(
    group: &Group<'_>,
    candidates: &[GroupKind],
    what: &str,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<GroupKind> {
    // A group without sections was already reported while bracketing.
    let head = group.sections.first()?;
    if let Some(kind) = dispatch(candidates, head.name) {
        return Some(kind);
    }

    let diagnostic = if proof_kinds(head.name).next().is_some() {
        error(ErrorCode::E407, format!("'{}' is not yet supported", head.name))
            .with_label(head.name_span, ErrorCode::E407.description())
    } else {
        let heads: Vec<_> = candidates.iter().map(|kind| kind.head()).collect();
        error(ErrorCode::E406, format!("Expected {what}, found '{}'", head.name))
            .with_label(head.name_span, ErrorCode::E406.description())
            .with_help(format!("expected one of: {}", heads.join(", ")))
    };
    diagnostics.append(diagnostic);
    None
}

/// Generates a builder per node enum that dispatches a group on its head
/// among the kinds the caller accepts.
macro_rules! group_builders {
    ($(
        $(#[$doc:meta])*
        fn $fn:ident -> $enum:ident [$what:literal] {
            $( $kind:ident => $build:expr ),* $(,)?
        }
    )*) => {$(
        $(#[$doc])*
        fn $fn(
            group: &Group<'_>,
            candidates: &[GroupKind],
            diagnostics: &mut DiagnosticTracker<'_>,
        ) -> Option<$enum> {
            let kind = resolve(group, candidates, $what, diagnostics)?;
            match kind {
                $( GroupKind::$kind => $build(kind, group, diagnostics).map($enum::from), )*
                _ => None,
            }
        }
    )*};
}

group_builders! {
    fn top_level_group -> TopLevelItem ["a top level item"] {
        Defines => assemble::<DefinesGroup>,
        Describes => assemble::<DescribesGroup>,
        States => assemble::<StatesGroup>,
        Axiom => assemble::<AxiomGroup>,
        Conjecture => assemble::<ConjectureGroup>,
        Theorem => assemble::<TheoremGroup>,
        Specify => assemble::<SpecifyGroup>,
        Topic => assemble::<TopicGroup>,
        Person => assemble::<PersonGroup>,
        Resource => assemble::<ResourceGroup>,
    }

    fn clause_group -> Clause ["a clause"] {
        AllOf => assemble::<AllOfGroup>,
        Not => assemble::<NotGroup>,
        AnyOf => assemble::<AnyOfGroup>,
        OneOf => assemble::<OneOfGroup>,
        ForAll => assemble::<ForAllGroup>,
        Exists => assemble::<ExistsGroup>,
        ExistsUnique => assemble::<ExistsUniqueGroup>,
        If => assemble::<IfGroup>,
        Iff => assemble::<IffGroup>,
        When => assemble::<WhenGroup>,
        Piecewise => piecewise,
        Given => assemble::<GivenGroup>,
    }

    fn provides_group -> ProvidesItem ["a 'symbol' or 'connection' group"] {
        SymbolWritten => assemble::<SymbolWrittenGroup>,
        Connection => assemble::<ConnectionGroup>,
    }

    fn documented_group -> DocumentedItem ["a documentation group"] {
        Overview => assemble::<OverviewGroup>,
        Motivation => assemble::<MotivationGroup>,
        History => assemble::<HistoryGroup>,
        Example => assemble::<ExampleGroup>,
        Related => assemble::<RelatedGroup>,
        Discoverer => assemble::<DiscovererGroup>,
        Note => assemble::<NoteGroup>,
        Written => assemble::<WrittenGroup>,
        Writing => assemble::<WritingGroup>,
        Called => assemble::<CalledGroup>,
    }

    fn justified_group -> JustifiedItem ["a 'label' or 'by' group"] {
        Label => assemble::<LabelGroup>,
        By => assemble::<ByGroup>,
    }

    fn specify_group -> SpecifyItem ["a number specification"] {
        Zero => assemble::<ZeroGroup>,
        PositiveInt => assemble::<PositiveIntGroup>,
        NegativeInt => assemble::<NegativeIntGroup>,
        PositiveFloat => assemble::<PositiveFloatGroup>,
        NegativeFloat => assemble::<NegativeFloatGroup>,
    }

    fn resource_group -> ResourceItem ["a resource field"] {
        Title => assemble::<TitleGroup>,
        Author => assemble::<AuthorGroup>,
        Offset => assemble::<OffsetGroup>,
        Url => assemble::<UrlGroup>,
        Homepage => assemble::<HomepageGroup>,
        Type => assemble::<TypeGroup>,
        Edition => assemble::<EditionGroup>,
        Editor => assemble::<EditorGroup>,
        Institution => assemble::<InstitutionGroup>,
        Journal => assemble::<JournalGroup>,
        Publisher => assemble::<PublisherGroup>,
        Volume => assemble::<VolumeGroup>,
        Month => assemble::<MonthGroup>,
        Year => assemble::<YearGroup>,
        Description => assemble::<DescriptionGroup>,
    }

    fn person_group -> PersonItem ["a 'name' or 'biography' group"] {
        Name => assemble::<NameGroup>,
        Biography => assemble::<BiographyGroup>,
    }

    fn note_group -> NoteItem ["a 'describing' group"] {
        Describing => assemble::<DescribingGroup>,
    }
}

/// A section item that can be built from one argument.
///
/// `kind` is the argument kind the schema declares for the section.
trait FromArgument: SectionItem + Sized {
    /// `None` when the argument was reported and dropped.
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self>;
}

fn text_item(literal: &Literal<'_>, diagnostics: &DiagnosticTracker<'_>) -> TextItem {
    TextItem::new(literal.text, position(diagnostics, literal.span.start()))
}

/// The literal of a backtick formulation or bare argument text.
fn formulation_literal<'a>(
    argument: &Argument<'a>,
    kind: ArgKind,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<Literal<'a>> {
    match argument.payload {
        Payload::Formulation(literal) | Payload::ArgumentText(literal) => Some(literal),
        _ => {
            wrong_kind(argument, kind, diagnostics);
            None
        }
    }
}

fn expression_literal(
    literal: &Literal<'_>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> (Option<Expression>, Position) {
    let root = formulation::parse_expression(literal.text, literal.start, diagnostics);
    (root, position(diagnostics, literal.span.start()))
}

impl FromArgument for NoArgument {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        wrong_kind(argument, kind, diagnostics);
        None
    }
}

impl FromArgument for TextItem {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        match &argument.payload {
            Payload::Text(literal) => Some(text_item(literal, diagnostics)),
            _ => {
                wrong_kind(argument, kind, diagnostics);
                None
            }
        }
    }
}

impl FromArgument for Target {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        let literal = formulation_literal(argument, kind, diagnostics)?;
        let root = formulation::parse_form(literal.text, literal.start, diagnostics);
        Some(Target::new(
            literal.text,
            root,
            position(diagnostics, literal.span.start()),
        ))
    }
}

impl FromArgument for Spec {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        let literal = formulation_literal(argument, kind, diagnostics)?;
        let (root, start) = expression_literal(&literal, diagnostics);
        let is_spec = |root: &Expression| {
            matches!(
                root,
                Expression::Is { .. } | Expression::Extends { .. } | Expression::Infix { .. }
            )
        };
        if root.as_ref().is_some_and(|root| !is_spec(root)) {
            diagnostics.append(
                error(ErrorCode::E404, "Expected a spec such as 'x is \\set' or 'x > 0'")
                    .with_label(argument.span, ErrorCode::E404.description()),
            );
        }
        Some(Spec::new(literal.text, root, start))
    }
}

impl FromArgument for Alias {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        let literal = formulation_literal(argument, kind, diagnostics)?;
        let (root, start) = expression_literal(&literal, diagnostics);
        if root
            .as_ref()
            .is_some_and(|root| !matches!(root, Expression::Alias { .. }))
        {
            diagnostics.append(
                error(ErrorCode::E404, "Expected an alias such as 'a \\op/ b :=> \\op{a, b}'")
                    .with_label(argument.span, ErrorCode::E404.description()),
            );
        }
        Some(Alias::new(literal.text, root, start))
    }
}

impl FromArgument for Formulation {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        let literal = formulation_literal(argument, kind, diagnostics)?;
        let (root, start) = expression_literal(&literal, diagnostics);
        Some(Formulation::new(literal.text, root, start))
    }
}

impl FromArgument for SignatureItem {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        let literal = formulation_literal(argument, kind, diagnostics)?;
        let root = formulation::parse_signature(literal.text, literal.start, diagnostics);
        Some(SignatureItem::new(
            literal.text,
            root,
            position(diagnostics, literal.span.start()),
        ))
    }
}

impl FromArgument for Clause {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        match &argument.payload {
            Payload::Formulation(literal) => {
                let (root, start) = expression_literal(literal, diagnostics);
                Some(Clause::Formulation(Formulation::new(literal.text, root, start)))
            }
            Payload::Group(group) => clause_group(group, kind.candidates(), diagnostics),
            _ => {
                wrong_kind(argument, kind, diagnostics);
                None
            }
        }
    }
}

/// Anything but a group is read as an alias.
impl FromArgument for ProvidesItem {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        match &argument.payload {
            Payload::Group(group) => provides_group(group, kind.candidates(), diagnostics),
            _ => Alias::from_argument(argument, ArgKind::Alias, diagnostics)
                .map(ProvidesItem::Alias),
        }
    }
}

impl FromArgument for NoteItem {
    fn from_argument(
        argument: &Argument<'_>,
        kind: ArgKind,
        diagnostics: &mut DiagnosticTracker<'_>,
    ) -> Option<Self> {
        match &argument.payload {
            Payload::Text(literal) => Some(NoteItem::Text(text_item(literal, diagnostics))),
            Payload::Group(group) => note_group(group, kind.candidates(), diagnostics),
            _ => {
                wrong_kind(argument, kind, diagnostics);
                None
            }
        }
    }
}

/// Items that can only be nested groups.
macro_rules! group_items {
    ($( $item:ident => $build:ident; )*) => {$(
        impl FromArgument for $item {
            fn from_argument(
                argument: &Argument<'_>,
                kind: ArgKind,
                diagnostics: &mut DiagnosticTracker<'_>,
            ) -> Option<Self> {
                match &argument.payload {
                    Payload::Group(group) => $build(group, kind.candidates(), diagnostics),
                    _ => {
                        wrong_kind(argument, kind, diagnostics);
                        None
                    }
                }
            }
        }
    )*};
}

group_items! {
    DocumentedItem => documented_group;
    JustifiedItem => justified_group;
    SpecifyItem => specify_group;
    ResourceItem => resource_group;
    PersonItem => person_group;
}

/// Builds the typed document from the group tree.
///
/// The flag is `true` when this phase reported nothing, whatever earlier
/// phases reported.
pub fn build_document(
    root: &Root<'_>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> (Document, bool) {
    let before = diagnostics.len();
    let items: Vec<_> = root
        .nodes
        .iter()
        .filter_map(|node| match node {
            TopLevelNode::Group(group) => top_level_group(group, TOP_LEVEL_GROUPS, diagnostics),
            TopLevelNode::TextBlock(literal) => Some(TopLevelItem::TextBlock(TextBlockItem::new(
                literal.text,
                position(diagnostics, literal.span.start()),
            ))),
        })
        .collect();

    let reported = diagnostics.len() - before;
    debug!(items = items.len(), reported; "Phase 5 complete");
    (Document::new(items), reported == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bracket::bracket, group_tree::build_tree, indent::mark_indentation, lexer::tokenize,
        position::PositionTracker,
    };

    fn parse_phases(source: &str) -> (Document, bool, Vec<Diagnostic>) {
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let raw = tokenize(source, &mut diagnostics);
        let tokens = bracket(mark_indentation(raw, &mut diagnostics), &mut diagnostics);
        let root = build_tree(&tokens, &mut diagnostics);
        let (document, clean) = build_document(&root, &mut diagnostics);
        (document, clean, diagnostics.into_diagnostics())
    }

    fn parse(source: &str) -> (Document, Vec<Diagnostic>) {
        let (document, _, diagnostics) = parse_phases(source);
        (document, diagnostics)
    }

    fn parse_clean(source: &str) -> Document {
        let (document, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        document
    }

    #[test]
    fn test_defines_with_id_and_optional_sections() {
        let document = parse_clean(
            "[\\even{n}]\nDefines: n\nwhen: `n is \\integer`\nmeans: `n % 2 = 0`\n",
        );
        let [TopLevelItem::Defines(defines)] = document.items.as_slice() else {
            panic!("expected one Defines group");
        };
        assert!(defines.id.root.is_some());
        assert_eq!(defines.id.raw, "\\even{n}");
        assert_eq!(defines.defines.items.len(), 1);
        assert!(defines.with.is_none());
        assert_eq!(defines.when.as_ref().map(|s| s.items.len()), Some(1));
        assert_eq!(defines.means.as_ref().map(|s| s.items.len()), Some(1));
        assert!(defines.specifies.is_none());
    }

    #[test]
    fn test_nested_clause_groups() {
        let document = parse_clean(
            "Axiom:\nthen:\n. forAll: x\n  then:\n  . not: `x = 0`\n",
        );
        let [TopLevelItem::Axiom(axiom)] = document.items.as_slice() else {
            panic!("expected one Axiom group");
        };
        let Some(Clause::ForAll(for_all)) = axiom.then.single() else {
            panic!("expected a forAll clause");
        };
        assert!(matches!(for_all.then.single(), Some(Clause::Not(_))));
    }

    #[test]
    fn test_opaque_ids_are_kept_verbatim() {
        let document = parse_clean("[some topic]\nTopic:\ncontent: \"About things.\"\n");
        let [TopLevelItem::Topic(topic)] = document.items.as_slice() else {
            panic!("expected one Topic group");
        };
        assert_eq!(topic.id, "some topic");
        assert_eq!(topic.content.items[0].raw, "About things.");
    }

    #[test]
    fn test_documented_groups() {
        let document = parse_clean(concat!(
            "[x \\in/ A]\n",
            "States:\n",
            "that: `x in A`\n",
            "Documented:\n",
            ". overview: \"Membership.\"\n",
            ". related: `\\set.of`\n",
        ));
        let [TopLevelItem::States(states)] = document.items.as_slice() else {
            panic!("expected one States group");
        };
        let documented = states.documented.as_ref().map(|s| s.items.len());
        assert_eq!(documented, Some(2));
    }

    #[test]
    fn test_piecewise_pairs() {
        let document = parse_clean(concat!(
            "Axiom:\n",
            "then:\n",
            ". piecewise:\n",
            "  if: `x > 0`\n",
            "  then: `x`\n",
            "  if: `x < 0`\n",
            "  then: `-x`\n",
            "  else: `0`\n",
        ));
        let [TopLevelItem::Axiom(axiom)] = document.items.as_slice() else {
            panic!("expected one Axiom group");
        };
        let Some(Clause::Piecewise(piecewise)) = axiom.then.single() else {
            panic!("expected a piecewise clause");
        };
        assert_eq!(piecewise.cases.len(), 2);
        assert!(piecewise.r#else.is_some());
    }

    #[test]
    fn test_text_blocks_become_items() {
        let document = parse_clean("::Some prose.::\n");
        let [TopLevelItem::TextBlock(block)] = document.items.as_slice() else {
            panic!("expected one text block");
        };
        assert_eq!(block.text, "Some prose.");
    }

    mod errors {
        use super::*;

        fn codes(source: &str) -> Vec<Option<ErrorCode>> {
            parse(source).1.iter().map(Diagnostic::code).collect()
        }

        #[test]
        fn test_missing_required_section() {
            let (document, diagnostics) = parse("Theorem:\ngiven: x\n");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E400));
            assert_eq!(diagnostics[0].origin(), Origin::Phase5Parser);
            assert!(diagnostics[0].message().contains("then"));
            assert_eq!(diagnostics[0].position(), Position::new(0, 0, 0));

            let [TopLevelItem::Theorem(theorem)] = document.items.as_slice() else {
                panic!("expected one Theorem group");
            };
            assert!(theorem.then.items.is_empty());
        }

        #[test]
        fn test_out_of_order_section_is_unexpected() {
            let (document, diagnostics) = parse("Theorem:\nthen: `x`\ngiven: x\n");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E401));
            assert!(diagnostics[0].message().contains("'given'"));
            assert!(diagnostics[0].help().is_some());

            let [TopLevelItem::Theorem(theorem)] = document.items.as_slice() else {
                panic!("expected one Theorem group");
            };
            assert!(theorem.given.is_none());
            assert_eq!(theorem.then.items.len(), 1);
        }

        #[test]
        fn test_duplicate_section() {
            let diagnostics = parse("Axiom:\nthen: `a`\nthen: `b`\n").1;
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E402));
            assert_eq!(diagnostics[0].labels().len(), 2);
        }

        #[test]
        fn test_cardinality_violation_empties_the_section() {
            let (document, diagnostics) = parse("Theorem:\nthen: `a`\nProof: \"a\", \"b\"\n");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E403));
            let [TopLevelItem::Theorem(theorem)] = document.items.as_slice() else {
                panic!("expected one Theorem group");
            };
            assert_eq!(theorem.proof.as_ref().map(|s| s.items.len()), Some(0));
        }

        #[test]
        fn test_wrong_argument_kind() {
            assert_eq!(codes("Axiom:\nthen: \"text\"\n"), [Some(ErrorCode::E404)]);
        }

        #[test]
        fn test_missing_id() {
            let (document, diagnostics) = parse("Defines: x\nmeans: `x`\n");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E405));
            let [TopLevelItem::Defines(defines)] = document.items.as_slice() else {
                panic!("expected one Defines group");
            };
            assert!(defines.id.root.is_none());
        }

        #[test]
        fn test_unknown_clause_head() {
            let diagnostics = parse("Axiom:\nthen:\n. bogus: `x`\n").1;
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E406));
            assert!(diagnostics[0].help().is_some_and(|help| help.contains("forAll")));
        }

        #[test]
        fn test_invalid_top_level_item() {
            let (document, diagnostics) = parse("forAll: x\nthen: `x`\n");
            assert!(document.items.is_empty());
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E406));
        }

        fn piecewise_clauses(source: &str) -> (usize, Vec<Diagnostic>) {
            let (document, diagnostics) = parse(source);
            let [TopLevelItem::Axiom(axiom)] = document.items.as_slice() else {
                panic!("expected one Axiom group");
            };
            (axiom.then.items.len(), diagnostics)
        }

        #[test]
        fn test_piecewise_then_without_if() {
            let (clauses, diagnostics) =
                piecewise_clauses("Axiom:\nthen:\n. piecewise:\n  then: `x`\n");
            assert_eq!(clauses, 0);
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E408));
            assert_eq!(diagnostics[0].message(), "Expected section 'if' but found 'then'");
        }

        #[test]
        fn test_piecewise_if_without_then() {
            let (clauses, diagnostics) = piecewise_clauses(concat!(
                "Axiom:\n",
                "then:\n",
                ". piecewise:\n",
                "  if: `x > 0`\n",
                "  then: `x`\n",
                "  if: `x < 0`\n",
            ));
            assert_eq!(clauses, 0);
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(
                diagnostics[0].message(),
                "Expected section 'then' to follow an 'if' section"
            );
            assert_eq!(diagnostics[0].position().row, 5);
        }

        #[test]
        fn test_piecewise_reports_every_section_after_else() {
            let (clauses, diagnostics) = piecewise_clauses(concat!(
                "Axiom:\n",
                "then:\n",
                ". piecewise:\n",
                "  if: `x > 0`\n",
                "  then: `x`\n",
                "  else: `0`\n",
                "  if: `x < 0`\n",
                "  then: `-x`\n",
            ));
            assert_eq!(clauses, 0);
            let messages: Vec<_> = diagnostics.iter().map(Diagnostic::message).collect();
            assert_eq!(
                messages,
                ["Unexpected section 'if'", "Unexpected section 'then'"]
            );
            assert!(diagnostics.iter().all(|d| d.code() == Some(ErrorCode::E401)));
            let rows: Vec<_> = diagnostics.iter().map(|d| d.position().row).collect();
            assert_eq!(rows, [6, 7]);
        }

        #[test]
        fn test_wrong_kind_names_the_declared_argument() {
            let diagnostics = parse("Theorem:\nthen: `x`\nProof: `y`\n").1;
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E404));
            assert_eq!(diagnostics[0].message(), "Expected a text, found a formulation");
        }

        #[test]
        fn test_optional_id_is_not_required() {
            let (document, diagnostics) = parse("Axiom:\nthen: `x`\n");
            assert!(diagnostics.is_empty());
            let [TopLevelItem::Axiom(axiom)] = document.items.as_slice() else {
                panic!("expected one Axiom group");
            };
            assert!(axiom.id.is_none());
        }

        #[test]
        fn test_phase_success_flag() {
            let (_, clean, diagnostics) = parse_phases("Axiom:\nthen: `x`\n");
            assert!(clean);
            assert!(diagnostics.is_empty());

            let (_, clean, diagnostics) = parse_phases("Axiom:\nthen: \"text\"\n");
            assert!(!clean);
            assert_eq!(diagnostics.len(), 1);

            // Earlier phases do not count against the structural match.
            let (_, clean, diagnostics) = parse_phases("Axiom:\n. \"oops\nthen: `x`\n");
            assert!(clean);
            assert_eq!(diagnostics[0].origin(), Origin::Phase1Lexer);
        }

        #[test]
        fn test_formulation_errors_are_absolute() {
            let source = "Axiom:\nthen: `a +`\n";
            let diagnostics = parse(source).1;
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].origin(), Origin::FormulationParser);
            assert_eq!(diagnostics[0].position().row, 1);
        }
    }
}
