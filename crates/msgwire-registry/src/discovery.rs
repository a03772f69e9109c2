use crate::candidate::Candidate;

/// Source of candidate declarations for registry construction.
pub trait Discovery: Send + Sync {
    fn discover(&self) -> Vec<Candidate>;
}

/// Every declaration made with `register_serializable!` in any crate linked
/// into the program.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedTypes;

impl Discovery for LinkedTypes {
    fn discover(&self) -> Vec<Candidate> {
        inventory::iter::<Candidate>
            .into_iter()
            .copied()
            .collect()
    }
}

/// A fixed list of declarations assembled by the caller.
#[derive(Debug, Default, Clone)]
pub struct ExplicitTypes(Vec<Candidate>);

impl ExplicitTypes {
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        Self(candidates.into_iter().collect())
    }

    /// Append one declaration.
    pub fn with(mut self, candidate: Candidate) -> Self {
        self.0.push(candidate);
        self
    }
}

impl Discovery for ExplicitTypes {
    fn discover(&self) -> Vec<Candidate> {
        self.0.clone()
    }
}
