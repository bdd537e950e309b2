use std::collections::HashSet;

use log::debug;

use crate::decl::{AcceptedTestCase, TypeDecl};
use crate::harvest::Harvester;

/// Decides which types transitively derive from a fixed set of root names.
#[derive(Debug, Clone)]
pub struct Resolver {
    roots: HashSet<String>,
    harvester: Harvester,
}

impl Resolver {
    pub fn new<I, S>(roots: I, test_prefix: &str) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Resolver {
            roots: roots.into_iter().map(Into::into).collect(),
            harvester: Harvester::new(test_prefix)?,
        })
    }

    /// Accept every type whose bases reach a root name, directly or through
    /// other accepted types, and harvest its test methods.
    ///
    /// Candidates are re-examined from the beginning after every acceptance, so
    /// a class accepted late can unlock a class seen earlier. Results are in
    /// acceptance order.
    pub fn resolve(&self, types: &[TypeDecl]) -> Vec<AcceptedTestCase> {
        let mut pending: Vec<&TypeDecl> = types.iter().filter(|t| t.has_bases()).collect();
        let mut accepted_names: HashSet<&str> = HashSet::new();
        let mut accepted: Vec<AcceptedTestCase> = Vec::new();

        'pass: loop {
            for position in 0..pending.len() {
                let candidate = pending[position];
                let qualifies = candidate.unqualified_bases().any(|base| {
                    self.roots.contains(base) || accepted_names.contains(base)
                });
                if !qualifies {
                    continue;
                }

                pending.remove(position);
                accepted_names.insert(candidate.name.as_str());

                let methods = self.harvester.harvest(candidate);
                debug!(
                    "accepted test case {} ({} methods) from {}",
                    candidate.name,
                    methods.len(),
                    candidate.path.display()
                );
                for method in &methods {
                    debug!("harvested {}", method.qualified_name());
                }
                accepted.push(AcceptedTestCase::new(candidate.clone(), methods));
                continue 'pass;
            }
            break;
        }

        accepted
    }
}
