//! Fuzzy name matching between layers and the documents describing them.
//!
//! Names are compared in three stages, stopping at the first hit:
//! 1. the normalized name (trimmed, lowercase, whitespace collapsed) of a document,
//! 2. its token key (split on anything that is not alphanumeric, tokens sorted), which pairs
//!    `roads main` with `main_roads`,
//! 3. names found inside the documents (aliases), again exact first and then by token key.
//!
//! The lookup tables are built once per pack, so each layer costs a few hash lookups.

use std::collections::HashMap;

/// Trims, lowercases and collapses runs of whitespace into single spaces.
pub fn normalize_name(name: &str) -> String {
	name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Splits a name on word/separator boundaries and joins the sorted lowercase tokens.
pub fn token_key(name: &str) -> String {
	let lower = name.to_lowercase();
	let mut tokens: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).collect();
	tokens.sort_unstable();
	tokens.join(" ")
}

/// Which stage of the lookup produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
	Exact,
	Tokens,
	AliasExact,
	AliasTokens,
}

#[derive(Clone, Debug)]
pub struct NameIndex<T> {
	exact: HashMap<String, T>,
	tokens: HashMap<String, T>,
	alias_exact: HashMap<String, T>,
	alias_tokens: HashMap<String, T>,
}

impl<T> Default for NameIndex<T> {
	fn default() -> Self {
		Self {
			exact: HashMap::new(),
			tokens: HashMap::new(),
			alias_exact: HashMap::new(),
			alias_tokens: HashMap::new(),
		}
	}
}

impl<T: Clone> NameIndex<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the primary name of a document (usually its file stem).
	///
	/// When two documents share a key the one inserted first wins.
	pub fn insert(&mut self, name: &str, value: T) {
		insert_keys(&mut self.exact, &mut self.tokens, name, value);
	}

	/// Registers a name found inside a document.
	pub fn insert_alias(&mut self, name: &str, value: T) {
		insert_keys(&mut self.alias_exact, &mut self.alias_tokens, name, value);
	}

	pub fn lookup(&self, name: &str) -> Option<(&T, MatchKind)> {
		let normalized = normalize_name(name);
		let tokens = token_key(name);

		if let Some(value) = self.exact.get(&normalized) {
			return Some((value, MatchKind::Exact));
		}
		if let Some(value) = self.tokens.get(&tokens) {
			return Some((value, MatchKind::Tokens));
		}
		if let Some(value) = self.alias_exact.get(&normalized) {
			return Some((value, MatchKind::AliasExact));
		}
		if let Some(value) = self.alias_tokens.get(&tokens) {
			return Some((value, MatchKind::AliasTokens));
		}
		None
	}

	pub fn get(&self, name: &str) -> Option<&T> {
		self.lookup(name).map(|(value, _)| value)
	}

	pub fn is_empty(&self) -> bool {
		self.exact.is_empty() && self.alias_exact.is_empty()
	}
}

fn insert_keys<T: Clone>(exact: &mut HashMap<String, T>, tokens: &mut HashMap<String, T>, name: &str, value: T) {
	let normalized = normalize_name(name);
	if normalized.is_empty() {
		return;
	}
	let key = token_key(name);
	if !key.is_empty() {
		tokens.entry(key).or_insert_with(|| value.clone());
	}
	exact.entry(normalized).or_insert(value);
}
