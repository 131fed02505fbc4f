//! The static section schema table.
//!
//! Every structural group kind is described by a [`Schema`]: an ordered list
//! of [`SectionSpec`]s whose first entry is the head section that names the
//! group. The phase-5 parser is a single loop driven by this table; it never
//! hard-codes section names except for the `piecewise` body.
//!
//! The table is indexed by [`GroupKind`], so `GroupKind::schema` is a plain
//! array lookup.

/// How many arguments a section accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// The section takes no arguments at all.
    None,
    ExactlyOne,
    OneOrMore,
    ZeroOrMore,
}

/// The kind of value each argument of a section is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    None,
    Text,
    Target,
    Spec,
    Clause,
    Alias,
    Formulation,
    Signature,
    Documented,
    Provides,
    Justified,
    Specify,
    Resource,
    Person,
    Note,
}

impl ArgKind {
    /// Group kinds accepted as a nested group in an argument of this kind,
    /// in dispatch priority order.
    pub fn candidates(self) -> &'static [GroupKind] {
        match self {
            ArgKind::Clause => CLAUSE_GROUPS,
            ArgKind::Documented => DOCUMENTED_GROUPS,
            ArgKind::Provides => PROVIDES_GROUPS,
            ArgKind::Justified => JUSTIFIED_GROUPS,
            ArgKind::Specify => SPECIFY_GROUPS,
            ArgKind::Resource => RESOURCE_GROUPS,
            ArgKind::Person => PERSON_GROUPS,
            ArgKind::Note => NOTE_GROUPS,
            ArgKind::None
            | ArgKind::Text
            | ArgKind::Target
            | ArgKind::Spec
            | ArgKind::Alias
            | ArgKind::Formulation
            | ArgKind::Signature => &[],
        }
    }

    /// What an argument of this kind looks like, for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            ArgKind::None => "no argument",
            ArgKind::Text => "a text",
            ArgKind::Target => "a target",
            ArgKind::Spec => "a spec",
            ArgKind::Clause => "a formulation or a group",
            ArgKind::Alias => "an alias",
            ArgKind::Formulation => "a formulation",
            ArgKind::Signature => "a signature",
            ArgKind::Documented => "a documentation group",
            ArgKind::Provides => "an alias or a 'symbol' or 'connection' group",
            ArgKind::Justified => "a 'label' or 'by' group",
            ArgKind::Specify => "a number specification group",
            ArgKind::Resource => "a resource field group",
            ArgKind::Person => "a 'name' or 'biography' group",
            ArgKind::Note => "a text or a 'describing' group",
        }
    }
}

/// How a group's bracketed `[...]` id is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdRule {
    /// Any id present is ignored.
    Ignored,
    /// Optional, parsed with the formulation id parser.
    OptionalFormulation,
    /// Required, parsed with the formulation id parser.
    RequiredFormulation,
    /// Required, kept as opaque text.
    RequiredText,
}

impl IdRule {
    pub fn is_required(self) -> bool {
        matches!(self, IdRule::RequiredFormulation | IdRule::RequiredText)
    }
}

/// One slot of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    pub name: &'static str,
    pub required: bool,
    pub cardinality: Cardinality,
    pub arg: ArgKind,
}

/// A section slot as a typed group declares it: the section name, whether
/// it is required, and the kind of its items.
pub type SlotLayout = (&'static str, bool, ArgKind);

/// The ordered section layout of a group kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub kind: GroupKind,
    pub id: IdRule,
    pub sections: &'static [SectionSpec],
}

impl Schema {
    /// The head section name, which identifies the group.
    pub fn head(&self) -> &'static str {
        self.sections.first().map_or("", |s| s.name)
    }

    /// Section names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.iter().map(|s| s.name)
    }

    /// The slots in schema order, without cardinalities.
    pub fn layout(&self) -> impl Iterator<Item = SlotLayout> + '_ {
        self.sections.iter().map(|s| (s.name, s.required, s.arg))
    }
}

/// Every structural group kind known to the parser.
///
/// The discriminant doubles as the index into the schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum GroupKind {
    AllOf,
    Not,
    AnyOf,
    OneOf,
    ForAll,
    Exists,
    ExistsUnique,
    If,
    Iff,
    When,
    Piecewise,
    Given,
    SymbolWritten,
    Connection,
    Overview,
    Motivation,
    History,
    Example,
    Related,
    Discoverer,
    Note,
    Describing,
    Written,
    Writing,
    Called,
    Label,
    By,
    Describes,
    Defines,
    States,
    Axiom,
    Conjecture,
    Theorem,
    Specify,
    Zero,
    PositiveInt,
    NegativeInt,
    PositiveFloat,
    NegativeFloat,
    Topic,
    Resource,
    Title,
    Author,
    Offset,
    Url,
    Homepage,
    Type,
    Edition,
    Editor,
    Institution,
    Journal,
    Publisher,
    Volume,
    Month,
    Year,
    Description,
    Person,
    Name,
    Biography,
    Proof,
    ProofThenBy,
    ProofThusBy,
    ProofThereforeBy,
    ProofHenceBy,
    ProofNoticeBy,
    ProofNextBy,
    ProofThenBecause,
    ProofThusBecause,
    ProofThereforeBecause,
    ProofHenceBecause,
    ProofNoticeBecause,
    ProofNextBecause,
    ProofByThen,
    ProofBecauseThen,
    ProofIndependently,
    ProofChain,
    ProofSuppose,
    ProofBlock,
    ProofCasewise,
    ProofWithoutLossOfGenerality,
    ProofQed,
    ProofContradiction,
    ProofDone,
    ProofForContradiction,
    ProofForInduction,
    ProofClaim,
}

impl GroupKind {
    /// The schema describing this kind.
    pub const fn schema(self) -> &'static Schema {
        &SCHEMAS[self as usize]
    }

    /// The head section name.
    pub fn head(self) -> &'static str {
        self.schema().head()
    }

    /// Whether this kind belongs to the proof family, which has schemas
    /// but no matcher yet.
    pub fn is_proof(self) -> bool {
        self >= GroupKind::Proof
    }

    /// All kinds in table order.
    pub fn all() -> impl Iterator<Item = GroupKind> {
        SCHEMAS.iter().map(|schema| schema.kind)
    }
}

/// Top-level group kinds in dispatch order.
pub const TOP_LEVEL_GROUPS: &[GroupKind] = &[
    GroupKind::Defines,
    GroupKind::Describes,
    GroupKind::States,
    GroupKind::Axiom,
    GroupKind::Conjecture,
    GroupKind::Theorem,
    GroupKind::Specify,
    GroupKind::Topic,
    GroupKind::Person,
    GroupKind::Resource,
];

/// Group kinds usable as a clause, in dispatch order.
pub const CLAUSE_GROUPS: &[GroupKind] = &[
    GroupKind::AllOf,
    GroupKind::Not,
    GroupKind::AnyOf,
    GroupKind::OneOf,
    GroupKind::ForAll,
    GroupKind::Exists,
    GroupKind::ExistsUnique,
    GroupKind::If,
    GroupKind::Iff,
    GroupKind::When,
    GroupKind::Piecewise,
    GroupKind::Given,
];

pub const PROVIDES_GROUPS: &[GroupKind] = &[GroupKind::SymbolWritten, GroupKind::Connection];

pub const DOCUMENTED_GROUPS: &[GroupKind] = &[
    GroupKind::Overview,
    GroupKind::Motivation,
    GroupKind::History,
    GroupKind::Example,
    GroupKind::Related,
    GroupKind::Discoverer,
    GroupKind::Note,
    GroupKind::Written,
    GroupKind::Writing,
    GroupKind::Called,
];

pub const JUSTIFIED_GROUPS: &[GroupKind] = &[GroupKind::Label, GroupKind::By];

pub const SPECIFY_GROUPS: &[GroupKind] = &[
    GroupKind::Zero,
    GroupKind::PositiveInt,
    GroupKind::NegativeInt,
    GroupKind::PositiveFloat,
    GroupKind::NegativeFloat,
];

pub const RESOURCE_GROUPS: &[GroupKind] = &[
    GroupKind::Title,
    GroupKind::Author,
    GroupKind::Offset,
    GroupKind::Url,
    GroupKind::Homepage,
    GroupKind::Type,
    GroupKind::Edition,
    GroupKind::Editor,
    GroupKind::Institution,
    GroupKind::Journal,
    GroupKind::Publisher,
    GroupKind::Volume,
    GroupKind::Month,
    GroupKind::Year,
    GroupKind::Description,
];

pub const PERSON_GROUPS: &[GroupKind] = &[GroupKind::Name, GroupKind::Biography];

pub const NOTE_GROUPS: &[GroupKind] = &[GroupKind::Describing];

/// Finds the kind in `candidates` whose head is `head`.
pub fn dispatch(candidates: &[GroupKind], head: &str) -> Option<GroupKind> {
    candidates.iter().copied().find(|kind| kind.head() == head)
}

/// Proof-family kinds whose head is `head`.
pub fn proof_kinds(head: &str) -> impl Iterator<Item = GroupKind> + '_ {
    GroupKind::all().filter(move |kind| kind.is_proof() && kind.head() == head)
}

const fn req(name: &'static str, cardinality: Cardinality, arg: ArgKind) -> SectionSpec {
    SectionSpec {
        name,
        required: true,
        cardinality,
        arg,
    }
}

const fn opt(name: &'static str, cardinality: Cardinality, arg: ArgKind) -> SectionSpec {
    SectionSpec {
        name,
        required: false,
        cardinality,
        arg,
    }
}

const fn schema(kind: GroupKind, id: IdRule, sections: &'static [SectionSpec]) -> Schema {
    Schema { kind, id, sections }
}

use ArgKind as A;
use Cardinality::{ExactlyOne as One, None as Nil, OneOrMore as Many, ZeroOrMore as Any};

const WHERE: SectionSpec = opt("where", Many, A::Spec);
const SUCH_THAT: SectionSpec = opt("suchThat", Many, A::Clause);
const THEN: SectionSpec = req("then", Many, A::Clause);
const MEANS: SectionSpec = req("means", One, A::Clause);
const WITH: SectionSpec = opt("with", Many, A::Target);
const USING: SectionSpec = opt("using", Many, A::Target);
const WHEN: SectionSpec = opt("when", Many, A::Clause);
const PROVIDES: SectionSpec = opt("Provides", Many, A::Provides);
const JUSTIFIED: SectionSpec = opt("Justified", Many, A::Justified);
const DOCUMENTED: SectionSpec = opt("Documented", Many, A::Documented);
const REFERENCES: SectionSpec = opt("References", Many, A::Text);
const ALIASES: SectionSpec = opt("Aliases", Many, A::Alias);
const META_ID: SectionSpec = opt("Id?", One, A::Text);

const fn text_one(name: &'static str) -> SectionSpec {
    req(name, One, A::Text)
}

const fn text_many(name: &'static str) -> SectionSpec {
    req(name, Many, A::Text)
}

static SCHEMAS: [Schema; 86] = [
    schema(GroupKind::AllOf, IdRule::Ignored, &[req("allOf", Many, A::Clause)]),
    schema(GroupKind::Not, IdRule::Ignored, &[req("not", One, A::Clause)]),
    schema(GroupKind::AnyOf, IdRule::Ignored, &[req("anyOf", Many, A::Clause)]),
    schema(GroupKind::OneOf, IdRule::Ignored, &[req("oneOf", Many, A::Clause)]),
    schema(
        GroupKind::ForAll,
        IdRule::Ignored,
        &[req("forAll", Many, A::Target), WHERE, SUCH_THAT, THEN],
    ),
    schema(
        GroupKind::Exists,
        IdRule::Ignored,
        &[req("exists", Many, A::Target), WHERE, SUCH_THAT],
    ),
    schema(
        GroupKind::ExistsUnique,
        IdRule::Ignored,
        &[
            req("existsUnique", Many, A::Target),
            WHERE,
            req("suchThat", Many, A::Clause),
        ],
    ),
    schema(GroupKind::If, IdRule::Ignored, &[req("if", Many, A::Clause), THEN]),
    schema(GroupKind::Iff, IdRule::Ignored, &[req("iff", Many, A::Clause), THEN]),
    schema(GroupKind::When, IdRule::Ignored, &[req("when", Many, A::Clause), THEN]),
    schema(
        GroupKind::Piecewise,
        IdRule::Ignored,
        &[
            req("piecewise", Nil, A::None),
            opt("if", Many, A::Clause),
            opt("then", Many, A::Clause),
            opt("else", Many, A::Clause),
        ],
    ),
    schema(
        GroupKind::Given,
        IdRule::Ignored,
        &[req("given", Many, A::Target), WHERE, SUCH_THAT, THEN],
    ),
    schema(
        GroupKind::SymbolWritten,
        IdRule::Ignored,
        &[req("symbol", One, A::Alias), opt("written", Many, A::Text)],
    ),
    schema(
        GroupKind::Connection,
        IdRule::Ignored,
        &[
            req("connection", Nil, A::None),
            USING,
            MEANS,
            opt("signifies", One, A::Spec),
            opt("viewable", Nil, A::None),
            opt("through", One, A::Formulation),
        ],
    ),
    schema(GroupKind::Overview, IdRule::Ignored, &[text_one("overview")]),
    schema(GroupKind::Motivation, IdRule::Ignored, &[text_one("motivation")]),
    schema(GroupKind::History, IdRule::Ignored, &[text_one("history")]),
    schema(GroupKind::Example, IdRule::Ignored, &[text_many("example")]),
    schema(GroupKind::Related, IdRule::Ignored, &[req("related", Many, A::Signature)]),
    schema(GroupKind::Discoverer, IdRule::Ignored, &[text_many("discoverer")]),
    schema(GroupKind::Note, IdRule::Ignored, &[req("note", Many, A::Note)]),
    schema(
        GroupKind::Describing,
        IdRule::Ignored,
        &[text_one("describing"), text_one("content")],
    ),
    schema(GroupKind::Written, IdRule::Ignored, &[text_many("written")]),
    schema(
        GroupKind::Writing,
        IdRule::Ignored,
        &[req("writing", One, A::Target), text_many("as")],
    ),
    schema(GroupKind::Called, IdRule::Ignored, &[text_many("called")]),
    schema(GroupKind::Label, IdRule::Ignored, &[text_one("label"), text_many("by")]),
    schema(GroupKind::By, IdRule::Ignored, &[text_many("by")]),
    schema(
        GroupKind::Describes,
        IdRule::RequiredFormulation,
        &[
            req("Describes", One, A::Target),
            WITH,
            USING,
            WHEN,
            SUCH_THAT,
            opt("extends", Many, A::Clause),
            opt("satisfies", Many, A::Clause),
            PROVIDES,
            JUSTIFIED,
            DOCUMENTED,
            REFERENCES,
            ALIASES,
            META_ID,
        ],
    ),
    schema(
        GroupKind::Defines,
        IdRule::RequiredFormulation,
        &[
            req("Defines", One, A::Target),
            WITH,
            USING,
            WHEN,
            SUCH_THAT,
            opt("means", One, A::Clause),
            opt("specifies", Many, A::Clause),
            PROVIDES,
            JUSTIFIED,
            DOCUMENTED,
            REFERENCES,
            ALIASES,
            META_ID,
        ],
    ),
    schema(
        GroupKind::States,
        IdRule::RequiredFormulation,
        &[
            req("States", Nil, A::None),
            WITH,
            USING,
            WHEN,
            SUCH_THAT,
            req("that", Many, A::Clause),
            DOCUMENTED,
            JUSTIFIED,
            REFERENCES,
            ALIASES,
            META_ID,
        ],
    ),
    schema(
        GroupKind::Axiom,
        IdRule::OptionalFormulation,
        &[
            req("Axiom", Any, A::Text),
            opt("given", Many, A::Target),
            WHERE,
            opt("if", Many, A::Clause),
            opt("iff", Many, A::Clause),
            THEN,
            DOCUMENTED,
            REFERENCES,
            ALIASES,
            META_ID,
        ],
    ),
    schema(
        GroupKind::Conjecture,
        IdRule::OptionalFormulation,
        &[
            req("Conjecture", Any, A::Text),
            opt("given", Many, A::Target),
            WHERE,
            opt("if", Many, A::Clause),
            opt("iff", Many, A::Clause),
            THEN,
            DOCUMENTED,
            REFERENCES,
            ALIASES,
            META_ID,
        ],
    ),
    schema(
        GroupKind::Theorem,
        IdRule::OptionalFormulation,
        &[
            req("Theorem", Any, A::Text),
            opt("given", Many, A::Target),
            WHERE,
            opt("if", Many, A::Clause),
            opt("iff", Many, A::Clause),
            THEN,
            opt("Proof", One, A::Text),
            DOCUMENTED,
            REFERENCES,
            ALIASES,
            META_ID,
        ],
    ),
    schema(
        GroupKind::Specify,
        IdRule::Ignored,
        &[req("Specify", Many, A::Specify), META_ID],
    ),
    schema(GroupKind::Zero, IdRule::Ignored, &[req("zero", Nil, A::None), MEANS]),
    schema(
        GroupKind::PositiveInt,
        IdRule::Ignored,
        &[req("positiveInt", One, A::Target), MEANS],
    ),
    schema(
        GroupKind::NegativeInt,
        IdRule::Ignored,
        &[req("negativeInt", One, A::Target), MEANS],
    ),
    schema(
        GroupKind::PositiveFloat,
        IdRule::Ignored,
        &[req("positiveFloat", One, A::Target), MEANS],
    ),
    schema(
        GroupKind::NegativeFloat,
        IdRule::Ignored,
        &[req("negativeFloat", One, A::Target), MEANS],
    ),
    schema(
        GroupKind::Topic,
        IdRule::RequiredText,
        &[req("Topic", Nil, A::None), text_one("content"), REFERENCES, META_ID],
    ),
    schema(
        GroupKind::Resource,
        IdRule::RequiredText,
        &[req("Resource", Many, A::Resource), META_ID],
    ),
    schema(GroupKind::Title, IdRule::Ignored, &[text_one("title")]),
    schema(GroupKind::Author, IdRule::Ignored, &[text_many("author")]),
    schema(GroupKind::Offset, IdRule::Ignored, &[text_one("offset")]),
    schema(GroupKind::Url, IdRule::Ignored, &[text_one("url")]),
    schema(GroupKind::Homepage, IdRule::Ignored, &[text_one("homepage")]),
    schema(GroupKind::Type, IdRule::Ignored, &[text_one("type")]),
    schema(GroupKind::Edition, IdRule::Ignored, &[text_one("edition")]),
    schema(GroupKind::Editor, IdRule::Ignored, &[text_one("editor")]),
    schema(GroupKind::Institution, IdRule::Ignored, &[text_one("institution")]),
    schema(GroupKind::Journal, IdRule::Ignored, &[text_one("journal")]),
    schema(GroupKind::Publisher, IdRule::Ignored, &[text_one("publisher")]),
    schema(GroupKind::Volume, IdRule::Ignored, &[text_one("volume")]),
    schema(GroupKind::Month, IdRule::Ignored, &[text_one("month")]),
    schema(GroupKind::Year, IdRule::Ignored, &[text_one("year")]),
    schema(GroupKind::Description, IdRule::Ignored, &[text_one("description")]),
    schema(
        GroupKind::Person,
        IdRule::RequiredText,
        &[req("Person", Many, A::Person), META_ID],
    ),
    schema(GroupKind::Name, IdRule::Ignored, &[text_many("name")]),
    schema(GroupKind::Biography, IdRule::Ignored, &[text_one("biography")]),
    // Proof family.
    schema(GroupKind::Proof, IdRule::Ignored, &[req("Proof", Many, A::Clause)]),
    schema(
        GroupKind::ProofThenBy,
        IdRule::Ignored,
        &[req("then", Many, A::Clause), opt("by", Many, A::Text)],
    ),
    schema(
        GroupKind::ProofThusBy,
        IdRule::Ignored,
        &[req("thus", Many, A::Clause), opt("by", Many, A::Text)],
    ),
    schema(
        GroupKind::ProofThereforeBy,
        IdRule::Ignored,
        &[req("therefore", Many, A::Clause), opt("by", Many, A::Text)],
    ),
    schema(
        GroupKind::ProofHenceBy,
        IdRule::Ignored,
        &[req("hence", Many, A::Clause), opt("by", Many, A::Text)],
    ),
    schema(
        GroupKind::ProofNoticeBy,
        IdRule::Ignored,
        &[req("notice", Many, A::Clause), opt("by", Many, A::Text)],
    ),
    schema(
        GroupKind::ProofNextBy,
        IdRule::Ignored,
        &[req("next", Many, A::Clause), opt("by", Many, A::Text)],
    ),
    schema(
        GroupKind::ProofThenBecause,
        IdRule::Ignored,
        &[req("then", Many, A::Clause), req("because", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofThusBecause,
        IdRule::Ignored,
        &[req("thus", Many, A::Clause), req("because", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofThereforeBecause,
        IdRule::Ignored,
        &[req("therefore", Many, A::Clause), req("because", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofHenceBecause,
        IdRule::Ignored,
        &[req("hence", Many, A::Clause), req("because", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofNoticeBecause,
        IdRule::Ignored,
        &[req("notice", Many, A::Clause), req("because", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofNextBecause,
        IdRule::Ignored,
        &[req("next", Many, A::Clause), req("because", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofByThen,
        IdRule::Ignored,
        &[req("by", Many, A::Text), THEN],
    ),
    schema(
        GroupKind::ProofBecauseThen,
        IdRule::Ignored,
        &[req("because", Many, A::Clause), THEN],
    ),
    schema(
        GroupKind::ProofIndependently,
        IdRule::Ignored,
        &[req("independently", Many, A::Clause)],
    ),
    schema(GroupKind::ProofChain, IdRule::Ignored, &[req("chain", Many, A::Clause)]),
    schema(
        GroupKind::ProofSuppose,
        IdRule::Ignored,
        &[req("suppose", Many, A::Clause), THEN],
    ),
    schema(GroupKind::ProofBlock, IdRule::Ignored, &[req("block", Many, A::Clause)]),
    schema(
        GroupKind::ProofCasewise,
        IdRule::Ignored,
        &[req("casewise", Many, A::Clause)],
    ),
    schema(
        GroupKind::ProofWithoutLossOfGenerality,
        IdRule::Ignored,
        &[req("withoutLossOfGenerality", Many, A::Clause)],
    ),
    schema(GroupKind::ProofQed, IdRule::Ignored, &[req("qed", Nil, A::None)]),
    schema(
        GroupKind::ProofContradiction,
        IdRule::Ignored,
        &[req("contradiction", Nil, A::None)],
    ),
    schema(GroupKind::ProofDone, IdRule::Ignored, &[req("done", Nil, A::None)]),
    schema(
        GroupKind::ProofForContradiction,
        IdRule::Ignored,
        &[
            req("forContradiction", Nil, A::None),
            req("suppose", Many, A::Clause),
            THEN,
        ],
    ),
    schema(
        GroupKind::ProofForInduction,
        IdRule::Ignored,
        &[
            req("forInduction", Nil, A::None),
            req("base", Many, A::Clause),
            req("generally", Many, A::Clause),
        ],
    ),
    schema(
        GroupKind::ProofClaim,
        IdRule::Ignored,
        &[
            req("claim", Many, A::Clause),
            opt("given", Many, A::Target),
            THEN,
            opt("proof", Many, A::Clause),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_table_is_indexed_by_kind() {
        for (index, schema) in SCHEMAS.iter().enumerate() {
            assert_eq!(schema.kind as usize, index, "{:?} is out of place", schema.kind);
        }
    }

    #[test]
    fn test_every_schema_has_required_head() {
        for kind in GroupKind::all() {
            let head = kind.schema().sections.first().expect("schema has a head");
            assert!(head.required, "{kind:?} head must be required");
        }
    }

    #[test]
    fn test_section_names_unique_within_schema() {
        for kind in GroupKind::all() {
            let mut seen = HashSet::new();
            for name in kind.schema().names() {
                assert!(seen.insert(name), "{kind:?} repeats section `{name}`");
            }
        }
    }

    #[test]
    fn test_dispatch_lists_have_unique_heads() {
        let lists = [
            TOP_LEVEL_GROUPS,
            CLAUSE_GROUPS,
            PROVIDES_GROUPS,
            DOCUMENTED_GROUPS,
            JUSTIFIED_GROUPS,
            SPECIFY_GROUPS,
            RESOURCE_GROUPS,
            PERSON_GROUPS,
            NOTE_GROUPS,
        ];
        for list in lists {
            let mut heads = HashSet::new();
            for kind in list {
                assert!(!kind.is_proof());
                assert!(heads.insert(kind.head()), "duplicate head `{}`", kind.head());
            }
        }
    }

    #[test]
    fn test_dispatch_finds_head() {
        assert_eq!(dispatch(CLAUSE_GROUPS, "forAll"), Some(GroupKind::ForAll));
        assert_eq!(dispatch(TOP_LEVEL_GROUPS, "Theorem"), Some(GroupKind::Theorem));
        assert_eq!(dispatch(CLAUSE_GROUPS, "Theorem"), None);
    }

    #[test]
    fn test_for_all_schema_layout() {
        let names: Vec<_> = GroupKind::ForAll.schema().names().collect();
        assert_eq!(names, ["forAll", "where", "suchThat", "then"]);
        let required: Vec<_> = GroupKind::ForAll
            .schema()
            .sections
            .iter()
            .map(|s| s.required)
            .collect();
        assert_eq!(required, [true, false, false, true]);
    }

    #[test]
    fn test_proof_kinds_share_heads() {
        let then_kinds: Vec<_> = proof_kinds("then").collect();
        assert_eq!(
            then_kinds,
            [GroupKind::ProofThenBy, GroupKind::ProofThenBecause]
        );
        assert_eq!(proof_kinds("forAll").count(), 0);
    }

    #[test]
    fn test_group_valued_arguments_have_candidates() {
        assert_eq!(ArgKind::Clause.candidates().len(), 12);
        assert!(ArgKind::Text.candidates().is_empty());
        assert_eq!(ArgKind::Note.candidates(), &[GroupKind::Describing]);
    }
}
