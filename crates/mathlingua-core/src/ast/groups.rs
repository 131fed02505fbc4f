//! Structural groups and the item enums that select between them.

use crate::{
    ast::{
        Alias, Assemble, Fill, Formulation, GroupId, IdItem, MetaData, NoArgument, NoId,
        Optional, Required, Section, SectionItem, SectionSlot, SignatureItem, Spec, Target,
        TextBlockItem, TextItem,
    },
    schema::{ArgKind, GroupKind, IdRule, SlotLayout},
    walk::{Node, NodeView},
};

/// Generates a group struct per schema.
///
/// Each field is declared with the schema section name it holds. Together
/// with the field's slot and item types this gives a [`SlotLayout`] per
/// field, collected in [`GROUP_LAYOUTS`] so the structs can be checked
/// against the schema table.
macro_rules! groups {
    ($(
        $(#[$doc:meta])*
        $name:ident => $kind:ident [id: $id:ty] {
            $( $field:ident($section:literal): $slot:ident<$item:ty> ),* $(,)?
        }
    )*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub meta: MetaData,
            pub id: $id,
            $( pub $field: $slot<$item>, )*
        }

        impl $name {
            pub const KIND: GroupKind = GroupKind::$kind;

            pub const ID_RULE: IdRule = <$id as GroupId>::RULE;

            /// Section slots in field order.
            pub const LAYOUT: &'static [SlotLayout] = &[$(
                ($section, <$slot<$item> as SectionSlot>::REQUIRED, <$item as SectionItem>::ARG)
            ),*];
        }

        impl Node for $name {
            fn view(&self) -> NodeView<'_> {
                NodeView::Group {
                    kind: Self::KIND,
                    id: self.id.id_view(),
                }
            }

            fn meta(&self) -> &MetaData {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut MetaData {
                &mut self.meta
            }

            fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node)) {
                $( SectionSlot::visit(&self.$field, f); )*
            }

            fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node)) {
                $( SectionSlot::visit_mut(&mut self.$field, f); )*
            }
        }

        impl<S> Assemble<S> for $name
        where
            $id: Fill<S>,
            $( $slot<$item>: Fill<S>, )*
        {
            fn assemble(source: &mut S, meta: MetaData) -> Self {
                Self {
                    meta,
                    id: Fill::fill(source),
                    $( $field: Fill::fill(source), )*
                }
            }
        }
    )*

    /// Kind, id rule and slots of every group built from the schema table.
    pub const GROUP_LAYOUTS: &[(GroupKind, IdRule, &[SlotLayout])] = &[
        $( ($name::KIND, $name::ID_RULE, $name::LAYOUT), )*
    ];
    };
}

/// Generates an enum over the node types accepted at one position.
macro_rules! node_enum {
    ($(
        $(#[$doc:meta])*
        $name:ident { $( $variant:ident($ty:ty) ),* $(,)? }
    )*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $( $variant($ty), )*
        }

        impl Node for $name {
            fn view(&self) -> NodeView<'_> {
                match self {
                    $( Self::$variant(node) => node.view(), )*
                }
            }

            fn meta(&self) -> &MetaData {
                match self {
                    $( Self::$variant(node) => node.meta(), )*
                }
            }

            fn meta_mut(&mut self) -> &mut MetaData {
                match self {
                    $( Self::$variant(node) => node.meta_mut(), )*
                }
            }

            fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node)) {
                match self {
                    $( Self::$variant(node) => node.for_each_child(f), )*
                }
            }

            fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node)) {
                match self {
                    $( Self::$variant(node) => node.for_each_child_mut(f), )*
                }
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(node: $ty) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    )*};
}

node_enum! {
    /// A statement: a formulation literal or a logical group.
    Clause {
        Formulation(Formulation),
        AllOf(AllOfGroup),
        Not(NotGroup),
        AnyOf(AnyOfGroup),
        OneOf(OneOfGroup),
        ForAll(ForAllGroup),
        Exists(ExistsGroup),
        ExistsUnique(ExistsUniqueGroup),
        If(IfGroup),
        Iff(IffGroup),
        When(WhenGroup),
        Piecewise(PiecewiseGroup),
        Given(GivenGroup),
    }

    ProvidesItem {
        Alias(Alias),
        SymbolWritten(SymbolWrittenGroup),
        Connection(ConnectionGroup),
    }

    DocumentedItem {
        Overview(OverviewGroup),
        Motivation(MotivationGroup),
        History(HistoryGroup),
        Example(ExampleGroup),
        Related(RelatedGroup),
        Discoverer(DiscovererGroup),
        Note(NoteGroup),
        Written(WrittenGroup),
        Writing(WritingGroup),
        Called(CalledGroup),
    }

    JustifiedItem {
        Label(LabelGroup),
        By(ByGroup),
    }

    SpecifyItem {
        Zero(ZeroGroup),
        PositiveInt(PositiveIntGroup),
        NegativeInt(NegativeIntGroup),
        PositiveFloat(PositiveFloatGroup),
        NegativeFloat(NegativeFloatGroup),
    }

    ResourceItem {
        Title(TitleGroup),
        Author(AuthorGroup),
        Offset(OffsetGroup),
        Url(UrlGroup),
        Homepage(HomepageGroup),
        Type(TypeGroup),
        Edition(EditionGroup),
        Editor(EditorGroup),
        Institution(InstitutionGroup),
        Journal(JournalGroup),
        Publisher(PublisherGroup),
        Volume(VolumeGroup),
        Month(MonthGroup),
        Year(YearGroup),
        Description(DescriptionGroup),
    }

    PersonItem {
        Name(NameGroup),
        Biography(BiographyGroup),
    }

    NoteItem {
        Text(TextItem),
        Describing(DescribingGroup),
    }

    /// An item at column zero of a document.
    TopLevelItem {
        Defines(DefinesGroup),
        Describes(DescribesGroup),
        States(StatesGroup),
        Axiom(AxiomGroup),
        Conjecture(ConjectureGroup),
        Theorem(TheoremGroup),
        Specify(SpecifyGroup),
        Topic(TopicGroup),
        Person(PersonGroup),
        Resource(ResourceGroup),
        TextBlock(TextBlockItem),
    }
}

groups! {
    AllOfGroup => AllOf [id: NoId] {
        all_of("allOf"): Required<Clause>,
    }

    NotGroup => Not [id: NoId] {
        not("not"): Required<Clause>,
    }

    AnyOfGroup => AnyOf [id: NoId] {
        any_of("anyOf"): Required<Clause>,
    }

    OneOfGroup => OneOf [id: NoId] {
        one_of("oneOf"): Required<Clause>,
    }

    ForAllGroup => ForAll [id: NoId] {
        for_all("forAll"): Required<Target>,
        r#where("where"): Optional<Spec>,
        such_that("suchThat"): Optional<Clause>,
        then("then"): Required<Clause>,
    }

    ExistsGroup => Exists [id: NoId] {
        exists("exists"): Required<Target>,
        r#where("where"): Optional<Spec>,
        such_that("suchThat"): Optional<Clause>,
    }

    ExistsUniqueGroup => ExistsUnique [id: NoId] {
        exists_unique("existsUnique"): Required<Target>,
        r#where("where"): Optional<Spec>,
        such_that("suchThat"): Required<Clause>,
    }

    IfGroup => If [id: NoId] {
        r#if("if"): Required<Clause>,
        then("then"): Required<Clause>,
    }

    IffGroup => Iff [id: NoId] {
        iff("iff"): Required<Clause>,
        then("then"): Required<Clause>,
    }

    WhenGroup => When [id: NoId] {
        when("when"): Required<Clause>,
        then("then"): Required<Clause>,
    }

    GivenGroup => Given [id: NoId] {
        given("given"): Required<Target>,
        r#where("where"): Optional<Spec>,
        such_that("suchThat"): Optional<Clause>,
        then("then"): Required<Clause>,
    }

    SymbolWrittenGroup => SymbolWritten [id: NoId] {
        symbol("symbol"): Required<Alias>,
        written("written"): Optional<TextItem>,
    }

    ConnectionGroup => Connection [id: NoId] {
        connection("connection"): Required<NoArgument>,
        using("using"): Optional<Target>,
        means("means"): Required<Clause>,
        signifies("signifies"): Optional<Spec>,
        viewable("viewable"): Optional<NoArgument>,
        through("through"): Optional<Formulation>,
    }

    OverviewGroup => Overview [id: NoId] {
        overview("overview"): Required<TextItem>,
    }

    MotivationGroup => Motivation [id: NoId] {
        motivation("motivation"): Required<TextItem>,
    }

    HistoryGroup => History [id: NoId] {
        history("history"): Required<TextItem>,
    }

    ExampleGroup => Example [id: NoId] {
        example("example"): Required<TextItem>,
    }

    RelatedGroup => Related [id: NoId] {
        related("related"): Required<SignatureItem>,
    }

    DiscovererGroup => Discoverer [id: NoId] {
        discoverer("discoverer"): Required<TextItem>,
    }

    NoteGroup => Note [id: NoId] {
        note("note"): Required<NoteItem>,
    }

    DescribingGroup => Describing [id: NoId] {
        describing("describing"): Required<TextItem>,
        content("content"): Required<TextItem>,
    }

    WrittenGroup => Written [id: NoId] {
        written("written"): Required<TextItem>,
    }

    WritingGroup => Writing [id: NoId] {
        writing("writing"): Required<Target>,
        r#as("as"): Required<TextItem>,
    }

    CalledGroup => Called [id: NoId] {
        called("called"): Required<TextItem>,
    }

    LabelGroup => Label [id: NoId] {
        label("label"): Required<TextItem>,
        by("by"): Required<TextItem>,
    }

    ByGroup => By [id: NoId] {
        by("by"): Required<TextItem>,
    }

    /// `[id] Describes:` introduces a new mathematical object.
    DescribesGroup => Describes [id: IdItem] {
        describes("Describes"): Required<Target>,
        with("with"): Optional<Target>,
        using("using"): Optional<Target>,
        when("when"): Optional<Clause>,
        such_that("suchThat"): Optional<Clause>,
        extends("extends"): Optional<Clause>,
        satisfies("satisfies"): Optional<Clause>,
        provides("Provides"): Optional<ProvidesItem>,
        justified("Justified"): Optional<JustifiedItem>,
        documented("Documented"): Optional<DocumentedItem>,
        references("References"): Optional<TextItem>,
        aliases("Aliases"): Optional<Alias>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    /// `[id] Defines:` introduces a predicate or a refinement.
    DefinesGroup => Defines [id: IdItem] {
        defines("Defines"): Required<Target>,
        with("with"): Optional<Target>,
        using("using"): Optional<Target>,
        when("when"): Optional<Clause>,
        such_that("suchThat"): Optional<Clause>,
        means("means"): Optional<Clause>,
        specifies("specifies"): Optional<Clause>,
        provides("Provides"): Optional<ProvidesItem>,
        justified("Justified"): Optional<JustifiedItem>,
        documented("Documented"): Optional<DocumentedItem>,
        references("References"): Optional<TextItem>,
        aliases("Aliases"): Optional<Alias>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    /// `[id] States:` names a statement.
    StatesGroup => States [id: IdItem] {
        states("States"): Required<NoArgument>,
        with("with"): Optional<Target>,
        using("using"): Optional<Target>,
        when("when"): Optional<Clause>,
        such_that("suchThat"): Optional<Clause>,
        that("that"): Required<Clause>,
        documented("Documented"): Optional<DocumentedItem>,
        justified("Justified"): Optional<JustifiedItem>,
        references("References"): Optional<TextItem>,
        aliases("Aliases"): Optional<Alias>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    AxiomGroup => Axiom [id: Option<IdItem>] {
        axiom("Axiom"): Required<TextItem>,
        given("given"): Optional<Target>,
        r#where("where"): Optional<Spec>,
        r#if("if"): Optional<Clause>,
        iff("iff"): Optional<Clause>,
        then("then"): Required<Clause>,
        documented("Documented"): Optional<DocumentedItem>,
        references("References"): Optional<TextItem>,
        aliases("Aliases"): Optional<Alias>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    ConjectureGroup => Conjecture [id: Option<IdItem>] {
        conjecture("Conjecture"): Required<TextItem>,
        given("given"): Optional<Target>,
        r#where("where"): Optional<Spec>,
        r#if("if"): Optional<Clause>,
        iff("iff"): Optional<Clause>,
        then("then"): Required<Clause>,
        documented("Documented"): Optional<DocumentedItem>,
        references("References"): Optional<TextItem>,
        aliases("Aliases"): Optional<Alias>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    TheoremGroup => Theorem [id: Option<IdItem>] {
        theorem("Theorem"): Required<TextItem>,
        given("given"): Optional<Target>,
        r#where("where"): Optional<Spec>,
        r#if("if"): Optional<Clause>,
        iff("iff"): Optional<Clause>,
        then("then"): Required<Clause>,
        proof("Proof"): Optional<TextItem>,
        documented("Documented"): Optional<DocumentedItem>,
        references("References"): Optional<TextItem>,
        aliases("Aliases"): Optional<Alias>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    SpecifyGroup => Specify [id: NoId] {
        specify("Specify"): Required<SpecifyItem>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    ZeroGroup => Zero [id: NoId] {
        zero("zero"): Required<NoArgument>,
        means("means"): Required<Clause>,
    }

    PositiveIntGroup => PositiveInt [id: NoId] {
        positive_int("positiveInt"): Required<Target>,
        means("means"): Required<Clause>,
    }

    NegativeIntGroup => NegativeInt [id: NoId] {
        negative_int("negativeInt"): Required<Target>,
        means("means"): Required<Clause>,
    }

    PositiveFloatGroup => PositiveFloat [id: NoId] {
        positive_float("positiveFloat"): Required<Target>,
        means("means"): Required<Clause>,
    }

    NegativeFloatGroup => NegativeFloat [id: NoId] {
        negative_float("negativeFloat"): Required<Target>,
        means("means"): Required<Clause>,
    }

    TopicGroup => Topic [id: String] {
        topic("Topic"): Required<NoArgument>,
        content("content"): Required<TextItem>,
        references("References"): Optional<TextItem>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    ResourceGroup => Resource [id: String] {
        resource("Resource"): Required<ResourceItem>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    TitleGroup => Title [id: NoId] {
        title("title"): Required<TextItem>,
    }

    AuthorGroup => Author [id: NoId] {
        author("author"): Required<TextItem>,
    }

    OffsetGroup => Offset [id: NoId] {
        offset("offset"): Required<TextItem>,
    }

    UrlGroup => Url [id: NoId] {
        url("url"): Required<TextItem>,
    }

    HomepageGroup => Homepage [id: NoId] {
        homepage("homepage"): Required<TextItem>,
    }

    TypeGroup => Type [id: NoId] {
        r#type("type"): Required<TextItem>,
    }

    EditionGroup => Edition [id: NoId] {
        edition("edition"): Required<TextItem>,
    }

    EditorGroup => Editor [id: NoId] {
        editor("editor"): Required<TextItem>,
    }

    InstitutionGroup => Institution [id: NoId] {
        institution("institution"): Required<TextItem>,
    }

    JournalGroup => Journal [id: NoId] {
        journal("journal"): Required<TextItem>,
    }

    PublisherGroup => Publisher [id: NoId] {
        publisher("publisher"): Required<TextItem>,
    }

    VolumeGroup => Volume [id: NoId] {
        volume("volume"): Required<TextItem>,
    }

    MonthGroup => Month [id: NoId] {
        month("month"): Required<TextItem>,
    }

    YearGroup => Year [id: NoId] {
        year("year"): Required<TextItem>,
    }

    DescriptionGroup => Description [id: NoId] {
        description("description"): Required<TextItem>,
    }

    PersonGroup => Person [id: String] {
        person("Person"): Required<PersonItem>,
        metadata_id("Id?"): Optional<TextItem>,
    }

    NameGroup => Name [id: NoId] {
        name("name"): Required<TextItem>,
    }

    BiographyGroup => Biography [id: NoId] {
        biography("biography"): Required<TextItem>,
    }
}

/// One `if:`/`then:` arm of a [`PiecewiseGroup`].
#[derive(Debug, Clone, PartialEq)]
pub struct IfThen {
    pub r#if: Section<Clause>,
    pub then: Section<Clause>,
}

/// `piecewise:` followed by `if:`/`then:` pairs and an optional `else:`.
///
/// The body alternates rather than following a fixed slot order, so this
/// group is built by hand instead of through [`Assemble`].
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseGroup {
    pub meta: MetaData,
    pub piecewise: Section<NoArgument>,
    pub cases: Vec<IfThen>,
    pub r#else: Option<Section<Clause>>,
}

impl PiecewiseGroup {
    pub const KIND: GroupKind = GroupKind::Piecewise;

    pub const ID_RULE: IdRule = IdRule::Ignored;

    /// The slots the `piecewise` body draws its sections from.
    pub const LAYOUT: &'static [SlotLayout] = &[
        ("piecewise", true, ArgKind::None),
        ("if", false, ArgKind::Clause),
        ("then", false, ArgKind::Clause),
        ("else", false, ArgKind::Clause),
    ];
}

impl Node for PiecewiseGroup {
    fn view(&self) -> NodeView<'_> {
        NodeView::Group {
            kind: Self::KIND,
            id: None,
        }
    }

    fn meta(&self) -> &MetaData {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaData {
        &mut self.meta
    }

    fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node)) {
        f(&self.piecewise);
        for case in &self.cases {
            f(&case.r#if);
            f(&case.then);
        }
        self.r#else.visit(f);
    }

    fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node)) {
        f(&mut self.piecewise);
        for case in &mut self.cases {
            f(&mut case.r#if);
            f(&mut case.then);
        }
        self.r#else.visit_mut(f);
    }
}
