//! Breadth-first enumeration of qualified setting names.

use crate::namespace::{Entry, Namespace, NamespaceTree};
use crate::ConfigOption;
use std::collections::VecDeque;
use std::slice;

/// Separator placed between a namespace and its keys.
pub const SEPARATOR: &str = "_";

/// Lazy iterator over `(qualified_name, option)` pairs.
///
/// Settings at the current level are yielded in declaration order; nested
/// namespaces are queued and visited after their siblings. Each call to
/// [`NamespaceTree::flatten`] starts a fresh traversal.
pub struct Flatten<'a> {
    current: Option<(String, Level<'a>)>,
    queue: VecDeque<(String, &'a Namespace)>,
}

enum Level<'a> {
    Tree(slice::Iter<'a, (String, Entry)>),
    Namespace(slice::Iter<'a, (String, ConfigOption)>),
}

impl<'a> Flatten<'a> {
    pub(crate) fn new(tree: &'a NamespaceTree, prefix: &str) -> Self {
        Self {
            current: Some((prefix.to_string(), Level::Tree(tree.entries().iter()))),
            queue: VecDeque::new(),
        }
    }

    /// Enumerate a single namespace, prefixing keys with `prefix`.
    pub fn namespace(namespace: &'a Namespace, prefix: &str) -> Self {
        Self {
            current: Some((
                prefix.to_string(),
                Level::Namespace(namespace.entries().iter()),
            )),
            queue: VecDeque::new(),
        }
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = (String, &'a ConfigOption);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((prefix, level)) = self.current.as_mut() else {
                let (prefix, namespace) = self.queue.pop_front()?;
                self.current = Some((prefix, Level::Namespace(namespace.entries().iter())));
                continue;
            };
            match level {
                Level::Tree(entries) => match entries.next() {
                    Some((name, Entry::Setting(option))) => {
                        return Some((format!("{prefix}{name}"), option));
                    }
                    Some((name, Entry::Namespace(namespace))) => {
                        self.queue
                            .push_back((format!("{prefix}{name}{SEPARATOR}"), namespace));
                    }
                    None => self.current = None,
                },
                Level::Namespace(entries) => match entries.next() {
                    Some((key, option)) => return Some((format!("{prefix}{key}"), option)),
                    None => self.current = None,
                },
            }
        }
    }
}
