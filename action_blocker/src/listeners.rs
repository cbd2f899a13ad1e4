use {
    action_components::ActionKind,
    action_events::{ActionQuery, Verdict},
    bevy::{platform::collections::HashMap, prelude::*},
};

/// Callback answering an [`ActionQuery`]. Gets read access to the world so it
/// can inspect the components it cares about.
pub type Listener = Box<dyn Fn(&World, &ActionQuery) -> Verdict + Send + Sync>;

struct DirectedListener {
    /// Decides whether the query's recipient is one this listener handles.
    accepts: fn(&World, Entity) -> bool,
    listener: Listener,
}

fn has_component<C: Component>(world: &World, entity: Entity) -> bool {
    world.get::<C>(entity).is_some()
}

fn any_entity(_: &World, _: Entity) -> bool {
    true
}

/// Registry of everything that wants a say in whether an action happens.
///
/// Directed listeners are keyed by component: they run when the entity the
/// query is delivered to carries that component. Broadcast listeners run for
/// every query of a broadcast kind (speak, emote), no matter who receives it.
#[derive(Resource, Default)]
pub struct ActionListeners {
    directed: HashMap<ActionKind, Vec<DirectedListener>>,
    broadcast: HashMap<ActionKind, Vec<Listener>>,
}

impl ActionListeners {
    /// Registers a listener that runs when the recipient has component `C`.
    pub fn on<C: Component>(
        &mut self,
        kind: ActionKind,
        listener: impl Fn(&World, &ActionQuery) -> Verdict + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_directed(kind, has_component::<C>, Box::new(listener))
    }

    /// Registers a listener that runs for every recipient of `kind`.
    pub fn on_any(
        &mut self,
        kind: ActionKind,
        listener: impl Fn(&World, &ActionQuery) -> Verdict + Send + Sync + 'static,
    ) -> &mut Self {
        self.push_directed(kind, any_entity, Box::new(listener))
    }

    /// Registers a global listener for a broadcast kind. Listeners for any
    /// other kind are discarded, since dispatch never reaches them.
    pub fn on_broadcast(
        &mut self,
        kind: ActionKind,
        listener: impl Fn(&World, &ActionQuery) -> Verdict + Send + Sync + 'static,
    ) -> &mut Self {
        if !kind.is_broadcast() {
            warn!(?kind, "ignoring broadcast listener for a directed-only action kind");
            return self;
        }
        self.broadcast
            .entry(kind)
            .or_default()
            .push(Box::new(listener));
        self
    }

    /// Number of listeners registered for `kind`, directed and broadcast.
    pub fn listener_count(&self, kind: ActionKind) -> usize {
        self.directed.get(&kind).map_or(0, Vec::len)
            + self.broadcast.get(&kind).map_or(0, Vec::len)
    }

    fn push_directed(
        &mut self,
        kind: ActionKind,
        accepts: fn(&World, Entity) -> bool,
        listener: Listener,
    ) -> &mut Self {
        self.directed
            .entry(kind)
            .or_default()
            .push(DirectedListener { accepts, listener });
        self
    }

    /// Delivers `query` to every matching listener and folds their answers.
    ///
    /// Directed listeners run first, then broadcast ones, each group in
    /// registration order. Every matching listener runs even after a veto.
    pub fn dispatch(&self, world: &World, query: &ActionQuery) -> Verdict {
        let mut verdict = Verdict::Allow;

        if let Some(directed) = self.directed.get(&query.kind) {
            for entry in directed
                .iter()
                .filter(|entry| (entry.accepts)(world, query.recipient))
            {
                verdict |= (entry.listener)(world, query);
            }
        }

        if query.kind.is_broadcast()
            && let Some(broadcast) = self.broadcast.get(&query.kind)
        {
            for listener in broadcast {
                verdict |= listener(world, query);
            }
        }

        trace!(kind = ?query.kind, actor = ?query.actor, target = ?query.target, ?verdict, "action query dispatched");
        verdict
    }
}
