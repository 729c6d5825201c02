use std::collections::BTreeMap;

use crate::direct::{self, ClusterSpec, ContextSpec, UserSpec};

/// Name-indexed view over a [`direct::KubeConfig`].
///
/// Built once per lookup pass. When a name appears more than once in a
/// list, the first definition wins.
#[derive(Debug, Clone)]
pub struct KubeConfigView<'a> {
    pub current_context: Option<&'a str>,
    pub contexts: BTreeMap<&'a str, &'a ContextSpec>,
    pub clusters: BTreeMap<&'a str, &'a ClusterSpec>,
    pub users: BTreeMap<&'a str, &'a UserSpec>,
}

fn index<'a, T, S: 'a>(
    entries: &'a [T],
    split: impl Fn(&'a T) -> (&'a str, &'a S),
) -> BTreeMap<&'a str, &'a S> {
    let mut map = BTreeMap::new();
    for (name, spec) in entries.iter().map(split) {
        map.entry(name).or_insert(spec);
    }
    map
}

impl<'a> From<&'a direct::KubeConfig> for KubeConfigView<'a> {
    fn from(kc: &'a direct::KubeConfig) -> Self {
        Self {
            current_context: kc.current_context.as_deref().filter(|ctx| !ctx.is_empty()),
            contexts: index(&kc.contexts, |ctx| (ctx.name.as_str(), &ctx.context)),
            clusters: index(&kc.clusters, |cls| (cls.name.as_str(), &cls.cluster)),
            users: index(&kc.users, |usr| (usr.name.as_str(), &usr.user)),
        }
    }
}

impl direct::KubeConfig {
    pub fn view(&self) -> KubeConfigView<'_> {
        KubeConfigView::from(self)
    }
}
