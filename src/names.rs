use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// C++ keywords that are not keywords in Java. A Java identifier equal to one
/// of these must never be emitted verbatim.
const CPP_ONLY_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "and",
    "and_eq",
    "asm",
    "atomic_cancel",
    "atomic_commit",
    "atomic_noexcept",
    "auto",
    "bitand",
    "bitor",
    "bool",
    "char16_t",
    "char32_t",
    "compl",
    "concept",
    "constexpr",
    "const_cast",
    "co_await",
    "co_return",
    "co_yield",
    "decltype",
    "delete",
    "dynamic_cast",
    "explicit",
    "export",
    "extern",
    "float",
    "friend",
    "inline",
    "module",
    "mutable",
    "namespace",
    "noexcept",
    "not",
    "not_eq",
    "nullptr",
    "operator",
    "or",
    "or_eq",
    "register",
    "reinterpret_cast",
    "requires",
    "signed",
    "sizeof",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "template",
    "thread_local",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "wchar_t",
    "xor",
    "xor_eq",
];

/// An identifier resolved against one naming scope. Never renamed afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniqueName(String);

impl UniqueName {
    fn new(base: &str, index: usize) -> Self {
        if index > 0 {
            Self(format!("{base}{index}"))
        } else {
            Self(base.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collision-free identifier allocation for one naming scope.
///
/// Each scope owns its own table; suffixes depend purely on allocation order
/// within that scope. Reserved C++ words are pre-seeded so the first request
/// for one already comes back suffixed.
pub struct NameTable {
    counts: HashMap<String, usize>,
}

static RESERVED_SEED: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    CPP_ONLY_KEYWORDS
        .iter()
        .map(|keyword| ((*keyword).to_string(), 1))
        .collect()
});

impl NameTable {
    pub fn new() -> Self {
        Self {
            counts: RESERVED_SEED.clone(),
        }
    }

    pub fn allocate(&mut self, name: &str) -> UniqueName {
        let count = self.counts.get(name).copied().unwrap_or(0);
        self.counts.insert(name.to_string(), count + 1);
        UniqueName::new(name, count)
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_follow_allocation_order() {
        let mut names = NameTable::new();
        assert_eq!(names.allocate("foo").as_str(), "foo");
        assert_eq!(names.allocate("foo").as_str(), "foo1");
        assert_eq!(names.allocate("foo").as_str(), "foo2");
        assert_eq!(names.allocate("bar").as_str(), "bar");
    }

    #[test]
    fn reserved_words_are_suffixed_immediately() {
        let mut names = NameTable::new();
        assert_eq!(names.allocate("delete").as_str(), "delete1");
        assert_eq!(names.allocate("delete").as_str(), "delete2");
        assert_eq!(names.allocate("typename").as_str(), "typename1");
    }

    #[test]
    fn scopes_do_not_interact() {
        let mut first = NameTable::new();
        let mut second = NameTable::new();
        assert_eq!(first.allocate("foo").as_str(), "foo");
        assert_eq!(second.allocate("foo").as_str(), "foo");
    }
}
