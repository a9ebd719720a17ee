#[cfg(test)]
mod tests {
    use crate::errors::CatalogError;
    use crate::source::FixtureSource;
    use crate::tests::common::{
        add_species, assert_ok, chain_payload, chain_url, link, species_url, test_pokedex,
        ARTWORK_URL,
    };
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Bulbasaur -> Ivysaur -> Venusaur, chain 1.
    fn linear_source() -> FixtureSource {
        let source = FixtureSource::new().with_payload(
            &chain_url(1),
            chain_payload(
                1,
                link(1, "bulbasaur", vec![link(2, "ivysaur", vec![link(3, "venusaur", vec![])])]),
            ),
        );
        add_species(&source, 1, "bulbasaur", Some(1));
        add_species(&source, 2, "ivysaur", Some(1));
        add_species(&source, 3, "venusaur", Some(1));
        source
    }

    /// Eevee with three sibling evolutions, chain 67.
    fn branching_source() -> FixtureSource {
        let source = FixtureSource::new().with_payload(
            &chain_url(67),
            chain_payload(
                67,
                link(
                    133,
                    "eevee",
                    vec![
                        link(134, "vaporeon", vec![]),
                        link(135, "jolteon", vec![]),
                        link(136, "flareon", vec![]),
                    ],
                ),
            ),
        );
        for (id, name) in [(133, "eevee"), (134, "vaporeon"), (135, "jolteon"), (136, "flareon")] {
            add_species(&source, id, name, Some(67));
        }
        source
    }

    #[tokio::test]
    async fn test_linear_chain_has_depth_three() {
        // Arrange
        let (_, pokedex) = test_pokedex(linear_source());

        // Act
        let tree = assert_ok(pokedex.resolve_evolution_tree(2).await);

        // Assert
        assert!(!tree.is_partial());
        assert_eq!(tree.root.id, 1);
        assert_eq!(tree.root.depth(), 3);
        assert_eq!(tree.root.ids(), vec![1, 2, 3]);
        assert_eq!(tree.root.image_url, format!("{}/1.png", ARTWORK_URL));
        let venusaur = tree.root.find(3).expect("venusaur in tree");
        assert!(venusaur.is_leaf());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_branching_chain_keeps_sibling_order() {
        let (_, pokedex) = test_pokedex(branching_source().with_jitter(Duration::from_millis(20)));

        let tree = assert_ok(pokedex.resolve_evolution_tree(133).await);

        assert_eq!(tree.root.name, "eevee");
        assert_eq!(tree.root.depth(), 2);
        let children: Vec<&str> = tree.root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["vaporeon", "jolteon", "flareon"]);
    }

    #[tokio::test]
    async fn test_cycle_in_chain_is_detected() {
        // Arrange: 1 -> 2 -> 1 on the same path
        let source = FixtureSource::new().with_payload(
            &chain_url(9),
            chain_payload(
                9,
                link(1, "bulbasaur", vec![link(2, "ivysaur", vec![link(1, "bulbasaur", vec![])])]),
            ),
        );
        add_species(&source, 1, "bulbasaur", Some(9));
        add_species(&source, 2, "ivysaur", Some(9));
        let (_, pokedex) = test_pokedex(source);

        // Act
        let result = pokedex.resolve_evolution_tree(1).await;

        // Assert
        assert_eq!(result, Err(CatalogError::CycleDetected { species_id: 1 }));
    }

    #[tokio::test]
    async fn test_same_species_on_sibling_paths_is_not_a_cycle() {
        let source = FixtureSource::new().with_payload(
            &chain_url(5),
            chain_payload(
                5,
                link(
                    10,
                    "root",
                    vec![
                        link(11, "left", vec![link(13, "shared", vec![])]),
                        link(12, "right", vec![link(13, "shared", vec![])]),
                    ],
                ),
            ),
        );
        for (id, name) in [(10, "root"), (11, "left"), (12, "right"), (13, "shared")] {
            add_species(&source, id, name, Some(5));
        }
        let (source, pokedex) = test_pokedex(source);

        let tree = assert_ok(pokedex.resolve_evolution_tree(10).await);

        assert_eq!(tree.root.node_count(), 5);
        assert_eq!(tree.root.ids(), vec![10, 11, 13, 12, 13]);
        assert_eq!(source.call_count(&species_url(13)), 1);
    }

    #[tokio::test]
    async fn test_failing_branch_is_pruned_and_recorded() {
        // Arrange
        let source = branching_source();
        source.fail_always(&species_url(135), CatalogError::unavailable("pokemon-species/135", "HTTP 500"));
        let (_, pokedex) = test_pokedex(source);

        // Act
        let tree = assert_ok(pokedex.resolve_evolution_tree(133).await);

        // Assert
        assert!(tree.is_partial());
        assert_eq!(tree.root.ids(), vec![133, 134, 136]);
        assert_eq!(tree.failures.len(), 1);
        assert_eq!(tree.failures[0].reference, "jolteon");
    }

    #[tokio::test]
    async fn test_species_without_chain_is_a_single_node() {
        let source = FixtureSource::new();
        add_species(&source, 132, "ditto", None);
        let (source, pokedex) = test_pokedex(source);

        let tree = assert_ok(pokedex.resolve_evolution_tree(132).await);

        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.name, "ditto");
        assert_eq!(tree.root.depth(), 1);
        assert_eq!(source.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_root_failure_fails_the_call() {
        let source = linear_source();
        source.fail_always(&chain_url(1), CatalogError::unavailable("evolution-chain/1", "timeout"));
        let (_, pokedex) = test_pokedex(source);

        let missing_species = pokedex.resolve_evolution_tree(9999).await;
        let missing_chain = pokedex.resolve_evolution_tree(1).await;

        assert!(matches!(missing_species, Err(CatalogError::NotFound { .. })));
        assert!(matches!(missing_chain, Err(CatalogError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_chain_is_shared_between_members() {
        let (source, pokedex) = test_pokedex(linear_source());

        let from_root = assert_ok(pokedex.resolve_evolution_tree(1).await);
        let from_leaf = assert_ok(pokedex.resolve_evolution_tree(3).await);

        assert_eq!(from_root, from_leaf);
        assert_eq!(source.call_count(&chain_url(1)), 1);
        assert_eq!(source.call_count(&species_url(2)), 1);
    }
}
