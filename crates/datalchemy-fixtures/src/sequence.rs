use std::collections::HashMap;

/// State scoped to the construction of a single root instance.
///
/// Created when a root build starts and dropped once the root is returned,
/// releasing its nested counters.
#[derive(Debug, Default)]
pub struct BuildContext {
    local: HashMap<String, i64>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sequential integers for `AutoIncrement` targets.
///
/// Root-level paths count across every root a builder produces; nested paths
/// (containing `.`) restart for each root.
#[derive(Debug, Default)]
pub struct SequenceCounters {
    global: HashMap<String, i64>,
}

impl SequenceCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, full_path: &str, ctx: &mut BuildContext) -> i64 {
        let counters = if full_path.contains('.') {
            &mut ctx.local
        } else {
            &mut self.global
        };
        let counter = counters.entry(full_path.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_paths_count_across_roots() {
        let mut counters = SequenceCounters::new();
        let first: Vec<i64> = (0..3)
            .map(|_| counters.next("id", &mut BuildContext::new()))
            .collect();
        assert_eq!(first, [1, 2, 3]);
    }

    #[test]
    fn nested_paths_restart_per_root() {
        let mut counters = SequenceCounters::new();

        let mut ctx = BuildContext::new();
        assert_eq!(counters.next("photos.id", &mut ctx), 1);
        assert_eq!(counters.next("photos.id", &mut ctx), 2);
        assert_eq!(counters.next("albums.id", &mut ctx), 1);

        let mut ctx = BuildContext::new();
        assert_eq!(counters.next("photos.id", &mut ctx), 1);
    }
}
