//! Capability-relation flattening.
//!
//! Each type's shape is its bases' shapes merged in declaration order (later bases override earlier ones), with
//! the type's own instance members and events on top. Only instance members and events are composed; statics
//! stay with their owner. Shapes are memoized per (module, type) for the duration of one build, and a stack of
//! in-progress types turns any cycle into a [`CorpusError::CompositionCycle`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use stubdex_core::lang::markers::{self, MarkerId};
use stubdex_core::version::VersionTag;

use super::Assembled;
use crate::error::CorpusError;
use crate::model::{MemberRole, Origin, Symbol, SymbolKind};
use crate::table::Table;

/// Provides the assembled declarations of collaborator modules.
pub trait CollaboratorSource {
    /// Declarations of `module` to compose against while building at `version`.
    ///
    /// ## Errors
    /// [`CorpusError::NoVersionAvailable`] for an unknown module; parse or I/O errors when it cannot be loaded.
    fn collaborator(&self, module: &str, version: &VersionTag) -> Result<Arc<Assembled>, CorpusError>;
}

/// Why a relation could not be flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum UnresolvedReason {
    UnknownModule,
    MissingType,
    CollaboratorFailed(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::UnknownModule => f.write_str("unknown module"),
            UnresolvedReason::MissingType => f.write_str("type not declared"),
            UnresolvedReason::CollaboratorFailed(msg) => write!(f, "collaborator failed to load: {msg}"),
        }
    }
}

/// A capability relation whose base could not be found. The build still succeeds without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedRelation {
    /// Module declaring the relation.
    pub module: String,
    pub owner: String,
    pub base: String,
    #[serde(flatten)]
    pub reason: UnresolvedReason,
}

/// (module, type) identity of a shape.
type TypeKey = (String, String);

/// Instance members and events of one type, keyed by member name.
#[derive(Debug, Default)]
struct Shape {
    members: BTreeMap<String, Symbol>,
    events: BTreeMap<String, Symbol>,
}

struct Composer<'s> {
    source: &'s dyn CollaboratorSource,
    primary: Arc<Assembled>,
    /// Collaborators loaded during this build, including failed loads.
    loaded: HashMap<String, Result<Arc<Assembled>, UnresolvedReason>>,
    memo: HashMap<TypeKey, Arc<Shape>>,
    stack: Vec<TypeKey>,
    unresolved: Vec<UnresolvedRelation>,
}

/// Build the resolved table of `primary`, flattening every capability relation.
///
/// ## Errors
/// [`CorpusError::CompositionCycle`] if the relations reachable from `primary` form a cycle.
#[tracing::instrument(skip_all, fields(module = %primary.module, version = %primary.version))]
pub fn build_table(primary: Arc<Assembled>, source: &dyn CollaboratorSource) -> Result<Table, CorpusError> {
    let mut composer = Composer {
        source,
        primary: Arc::clone(&primary),
        loaded: HashMap::new(),
        memo: HashMap::new(),
        stack: Vec::new(),
        unresolved: Vec::new(),
    };

    let mut symbols = primary.symbols.clone();
    for owner in primary.relations.keys() {
        let shape = composer.flatten(&primary, owner)?;
        for symbol in shape.members.values().chain(shape.events.values()) {
            if symbol.origin.is_none() {
                continue;
            }
            // Own declarations (including statics of the same name) win over composed ones.
            symbols
                .entry(symbol.qualified_name.clone())
                .or_insert_with(|| symbol.clone());
        }
    }

    for rel in &composer.unresolved {
        tracing::warn!(
            module = %rel.module,
            owner = %rel.owner,
            base = %rel.base,
            reason = %rel.reason,
            "unresolved capability relation"
        );
    }

    Ok(Table::new(
        primary.module.clone(),
        primary.version.clone(),
        primary.doc.clone(),
        primary.namespace.clone(),
        primary.aliases.clone(),
        symbols,
        composer.unresolved,
    ))
}

impl Composer<'_> {
    fn flatten(&mut self, asm: &Arc<Assembled>, ty: &str) -> Result<Arc<Shape>, CorpusError> {
        let key: TypeKey = (asm.module.clone(), ty.to_string());
        if let Some(shape) = self.memo.get(&key) {
            return Ok(Arc::clone(shape));
        }
        if let Some(pos) = self.stack.iter().position(|k| *k == key) {
            let cycle = self.stack[pos..]
                .iter()
                .chain(std::iter::once(&key))
                .map(|(m, t)| format!("{m}:{t}"))
                .collect();
            return Err(CorpusError::CompositionCycle {
                module: self.primary.module.clone(),
                version: self.primary.version.clone(),
                cycle,
            });
        }

        self.stack.push(key.clone());
        let result = self.compose(asm, ty);
        self.stack.pop();

        let shape = Arc::new(result?);
        self.memo.insert(key, Arc::clone(&shape));
        Ok(shape)
    }

    fn compose(&mut self, asm: &Arc<Assembled>, ty: &str) -> Result<Shape, CorpusError> {
        let mut shape = Shape::default();

        let bases = asm.relations.get(ty).cloned().unwrap_or_default();
        for base in &bases {
            let target = asm.scope().locate(base);
            let base_asm = match self.load(&target.module) {
                Ok(found) => found,
                Err(reason) => {
                    self.unresolved(asm, ty, base, reason);
                    continue;
                }
            };
            if !base_asm.declares(&target.name) {
                self.unresolved(asm, ty, base, UnresolvedReason::MissingType);
                continue;
            }
            let base_shape = self.flatten(&base_asm, &target.name)?;
            for symbol in base_shape.members.values() {
                let composed = composed_into(symbol, &asm.module, ty);
                shape.members.insert(symbol.name().to_string(), composed);
            }
            for (name, symbol) in &base_shape.events {
                shape.events.insert(name.clone(), composed_into(symbol, &asm.module, ty));
            }
        }

        for symbol in asm.own_instance_members(ty) {
            let slot = if symbol.kind == SymbolKind::Event {
                &mut shape.events
            } else {
                &mut shape.members
            };
            slot.insert(symbol.name().to_string(), symbol.clone());
        }
        Ok(shape)
    }

    fn load(&mut self, module: &str) -> Result<Arc<Assembled>, UnresolvedReason> {
        if module == self.primary.module {
            return Ok(Arc::clone(&self.primary));
        }
        if let Some(found) = self.loaded.get(module) {
            return found.clone();
        }
        let loaded = match self.source.collaborator(module, &self.primary.version) {
            Ok(asm) => {
                tracing::debug!(collaborator = module, version = %asm.version, "loaded collaborator");
                Ok(asm)
            }
            Err(CorpusError::NoVersionAvailable { .. }) => Err(UnresolvedReason::UnknownModule),
            Err(e) => Err(UnresolvedReason::CollaboratorFailed(e.to_string())),
        };
        self.loaded.insert(module.to_string(), loaded.clone());
        loaded
    }

    fn unresolved(&mut self, asm: &Assembled, owner: &str, base: &str, reason: UnresolvedReason) {
        self.unresolved.push(UnresolvedRelation {
            module: asm.module.clone(),
            owner: owner.to_string(),
            base: base.to_string(),
            reason,
        });
    }
}

/// Re-home a base's member under `owner` of `module`, remembering where it came from.
fn composed_into(symbol: &Symbol, module: &str, owner: &str) -> Symbol {
    let name = symbol.name();
    let events = markers::as_str(MarkerId::Events);
    let qualified_name = match (owner.is_empty(), symbol.kind == SymbolKind::Event) {
        (true, false) => name.to_string(),
        (true, true) => format!("{events}.{name}"),
        (false, false) => format!("{owner}.{name}"),
        (false, true) => format!("{owner}.{events}.{name}"),
    };
    let role = if owner.is_empty() && symbol.kind != SymbolKind::Event {
        MemberRole::Module
    } else {
        MemberRole::Instance
    };
    Symbol {
        origin: symbol.origin.clone().or_else(|| {
            Some(Origin {
                module: symbol.module.clone(),
                qualified_name: symbol.qualified_name.clone(),
            })
        }),
        qualified_name,
        module: module.to_string(),
        role,
        owner: (!owner.is_empty()).then(|| owner.to_string()),
        ..symbol.clone()
    }
}
