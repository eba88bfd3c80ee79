//! Mapper factory
//!
//! Every plugin id currently resolves to the basic mapper. The id stays in
//! the signature so future plugins can diverge without changing callers.

use super::basic::BasicMapper;
use super::{Mapper, MapperId};

/// Build the mapper implementation for a plugin id.
pub fn mapper_for(_id: &MapperId) -> Box<dyn Mapper> {
    Box::new(BasicMapper::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_gets_basic_mapper() {
        let mapper = mapper_for(&MapperId::new("kyverno"));
        assert_eq!(mapper.name().as_str(), "basic");

        let other = mapper_for(&MapperId::new("anything-else"));
        assert_eq!(other.name().as_str(), "basic");
    }
}
