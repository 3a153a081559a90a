// sorrel-core - Special-form, builtin and reader-macro tokens
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tokens the reader resolves at read time.
//!
//! Special-form names always read as [`SpecialForm`] tokens, so they cannot
//! be shadowed. A symbol written `.name` reads as the [`BuiltIn`] token
//! `name`; builtins are also reachable through Vars in the `core`
//! namespace.

use std::fmt;

use super::Value;

/// The fixed set of special forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialForm {
    Quote,
    If,
    Do,
    Def,
    Let,
    Var,
    Fn,
    Defmacro,
    Loop,
    Recur,
    Apply,
    Attempt,
}

impl SpecialForm {
    pub const ALL: [SpecialForm; 12] = [
        SpecialForm::Quote,
        SpecialForm::If,
        SpecialForm::Do,
        SpecialForm::Def,
        SpecialForm::Let,
        SpecialForm::Var,
        SpecialForm::Fn,
        SpecialForm::Defmacro,
        SpecialForm::Loop,
        SpecialForm::Recur,
        SpecialForm::Apply,
        SpecialForm::Attempt,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::If => "if",
            SpecialForm::Do => "do",
            SpecialForm::Def => "def",
            SpecialForm::Let => "let",
            SpecialForm::Var => "var",
            SpecialForm::Fn => "fn",
            SpecialForm::Defmacro => "defmacro",
            SpecialForm::Loop => "loop",
            SpecialForm::Recur => "recur",
            SpecialForm::Apply => "apply",
            SpecialForm::Attempt => "attempt",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sf| sf.name() == name)
    }
}

impl fmt::Display for SpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! builtin_table {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Identity of a builtin function. The implementation lives in
        /// [`crate::builtins`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum BuiltIn {
            $($variant),*
        }

        impl BuiltIn {
            pub const ALL: &'static [BuiltIn] = &[$(BuiltIn::$variant),*];

            /// The unprefixed name, also used for the `core` Var.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(BuiltIn::$variant => $name),*
                }
            }

            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(BuiltIn::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

builtin_table! {
    // arithmetic
    Add => "+",
    Subtract => "-",
    Multiply => "*",
    Divide => "/",
    Rem => "rem",
    Quot => "quot",
    Inc => "inc",
    Dec => "dec",
    Int => "int",
    Double => "double",
    // comparison and logic
    Equals => "=",
    NumEquals => "==",
    Lt => "<",
    Le => "<=",
    Gt => ">",
    Ge => ">=",
    Not => "not",
    Identical => "identical?",
    // predicates
    NilP => "nil?",
    NumberP => "number?",
    IntP => "int?",
    FloatP => "float?",
    StringP => "string?",
    SymbolP => "symbol?",
    KeywordP => "keyword?",
    FnP => "fn?",
    SeqP => "seq?",
    VectorP => "vector?",
    MapP => "map?",
    CharP => "char?",
    VarP => "var?",
    TrueP => "true?",
    FalseP => "false?",
    PosP => "pos?",
    NegP => "neg?",
    ZeroP => "zero?",
    NanP => "nan?",
    InfiniteP => "infinite?",
    // collections
    List => "list",
    Vector => "vector",
    Hashmap => "hashmap",
    Cons => "cons",
    First => "first",
    Rest => "rest",
    Next => "next",
    Seq => "seq",
    Concat => "concat",
    Nth => "nth",
    Get => "get",
    Count => "count",
    Assoc => "assoc",
    Dissoc => "dissoc",
    Conj => "conj",
    EmptyP => "empty?",
    Keys => "keys",
    Vals => "vals",
    // laziness
    LazySeq => "lazy-seq",
    RealizedP => "realized?",
    Reduce => "reduce",
    // names
    Symbol => "symbol",
    Keyword => "keyword",
    Name => "name",
    Namespace => "namespace",
    Gensym => "gensym",
    // strings and patterns
    Str => "str",
    Subs => "subs",
    UpperCase => "upper-case",
    LowerCase => "lower-case",
    Replace => "replace",
    ReplaceFirst => "replace-first",
    Sb => "sb",
    SbAppend => "sb-append",
    SbReverse => "sb-reverse",
    RePattern => "re-pattern",
    ReFind => "re-find",
    ReSeq => "re-seq",
    ReIterate => "re-iterate",
    // host I/O
    Print => "print",
    Println => "println",
    Read => "read",
    ReadString => "read-string",
    // evaluation
    Eval => "eval",
    Macroexpand => "macroexpand",
    Error => "error",
    Deref => "deref",
    // namespaces
    NsCreate => "ns-create",
    NsSet => "ns-set",
    NsGet => "ns-get",
    NsName => "ns-name",
    NsAll => "ns-all",
    NsFind => "ns-find",
    NsRemove => "ns-remove",
    NsUnmap => "ns-unmap",
    NsAlias => "ns-alias",
    NsUnalias => "ns-unalias",
    NsAliases => "ns-aliases",
    NsRefer => "ns-refer",
    NsResolve => "ns-resolve",
    NsInterns => "ns-interns",
    NsRefers => "ns-refers",
    NsMap => "ns-map",
}

impl fmt::Display for BuiltIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.name())
    }
}

/// The reader macros that wrap a single following form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderMacro {
    Quote,
    SyntaxQuote,
    Unquote,
    UnquoteSplice,
}

impl ReaderMacro {
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            ReaderMacro::Quote => "'",
            ReaderMacro::SyntaxQuote => "`",
            ReaderMacro::Unquote => "~",
            ReaderMacro::UnquoteSplice => "~@",
        }
    }
}

/// A reader macro applied to a form, awaiting expansion.
#[derive(Debug, Clone)]
pub struct ReaderMacroForm {
    pub kind: ReaderMacro,
    pub form: Value,
}

impl fmt::Display for ReaderMacroForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.form)
    }
}
