/// Asserts the population still holds exactly the expected number of organisms.
#[macro_export]
macro_rules! assert_cardinality {
    ($population:expr, $count:expr) => {
        assert_eq!($population.len(), $count, "Population cardinality changed");
    };
}

/// Asserts a genome's executable size lies within the given bounds.
#[macro_export]
macro_rules! assert_genome_bounds {
    ($genome:expr, $min:expr, $max:expr) => {
        let len = $genome.len();
        assert!(
            ($min..=$max).contains(&len),
            "Genome size {} outside [{}, {}]",
            len,
            $min,
            $max
        );
    };
}

/// Asserts the actuator values an organism currently shows.
#[macro_export]
macro_rules! assert_display {
    ($organism:expr, $expected:expr) => {
        assert_eq!(
            $organism.display().0,
            $expected,
            "Unexpected actuator display"
        );
    };
}
