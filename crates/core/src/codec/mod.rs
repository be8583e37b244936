//! Codec - concrete-type registry and descriptor cache
//!
//! The [`Codec`] owns every [`TypeInfo`] it derives. Concrete types are
//! registered under a TypeURL at startup so that polymorphic (interface)
//! values can be resolved by name at decode time; any other type gets a
//! descriptor lazily on first lookup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           Codec                              │
//! │   Mutex<RegistryState>                                       │
//! │     type_infos: Type ──────► Arc<TypeInfo>                   │
//! │     name_infos: "demo.Msg" ► Arc<TypeInfo>                   │
//! │     seal: Open | AutosealPending | Sealed                    │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │ register_type                 │ type_info*
//!                ▼                               ▼
//! ┌──────────────────────────────┐   ┌──────────────────────────┐
//! │ derive descriptor            │   │ canonical type / name /  │
//! │   fields.rs  (struct info)   │   │ URL lookup; lazily       │
//! │   typ3.rs    (wire types)    │   │ derive unknown types     │
//! │   hooks.rs   (repr hooks)    │   │                          │
//! │   WellKnown  (flags)         │   │                          │
//! └──────────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use polycodec_core::{Codec, Reflect};
//!
//! #[derive(Reflect, Default)]
//! pub struct Msg {
//!     #[tag(binary = "fixed64")]
//!     pub a: i64,
//! }
//!
//! let codec = Codec::new();
//! codec.register::<Msg>("acme.io/demo.Msg")?;
//! codec.seal();
//!
//! let info = codec.type_info_by_url("acme.io/demo.Msg", &Default::default())?;
//! assert!(info.is_registered());
//! ```
//!
//! # Concurrency
//!
//! Every operation takes the one registry lock, lookups included: a lookup
//! of an unknown type inserts its descriptor, and two callers must not
//! derive and insert the same type concurrently.

pub mod fields;
pub mod hash;
pub mod hooks;
pub mod names;
pub mod package;
mod print;
pub mod typ3;
pub mod type_info;
pub mod well_known;

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::CodecConfig;
use crate::error::{LookupError, SchemaError, SchemaResult};
use crate::reflect::{Kind, Reflect, Type};

pub use fields::{is_exported, parse_field_options, parse_struct_info};
pub use hash::fnv1a_64;
pub use hooks::{detect_hooks, Hooks, MarshalRepr, UnmarshalRepr};
pub use names::{name_from_url, DURATION_NAME, TIMESTAMP_NAME};
pub use package::{Package, PackageInfo};
pub use typ3::{typ3_of, Typ3};
pub use type_info::{ConcreteInfo, FieldInfo, FieldOptions, StructInfo, TypeInfo, WellKnownFlags};
pub use well_known::{ProtoDuration, StdWellKnown, Timestamp, WellKnown};

/// Registration lifecycle
///
/// `Open -> AutosealPending` only via [`Codec::autoseal`]; any non-sealed
/// state moves to `Sealed` via [`Codec::seal`] or [`Codec::finalize`].
/// `Sealed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SealState {
    #[default]
    Open,
    /// Seal on the next [`Codec::finalize`]
    AutosealPending,
    Sealed,
}

#[derive(Default)]
struct RegistryState {
    /// Keyed by canonical (pointer-stripped) type
    type_infos: HashMap<Type, Arc<TypeInfo>>,
    /// Registered types only, keyed by short name
    name_infos: HashMap<String, Arc<TypeInfo>>,
    seal: SealState,
}

/// Type registry and descriptor cache
///
/// Independent instances do not share state.
pub struct Codec {
    state: Mutex<RegistryState>,
    well_known: Arc<dyn WellKnown>,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Codec")
            .field("types", &state.type_infos.len())
            .field("registered", &state.name_infos.len())
            .field("seal", &state.seal)
            .finish()
    }
}

impl Codec {
    /// Create an empty, open codec using [`StdWellKnown`]
    pub fn new() -> Self {
        Self::with_well_known(Arc::new(StdWellKnown))
    }

    /// Create an empty, open codec with custom well-known predicates
    pub fn with_well_known(well_known: Arc<dyn WellKnown>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            well_known,
        }
    }

    /// Create a codec configured from `config`
    ///
    /// With `autoseal` set, the codec starts in [`SealState::AutosealPending`].
    pub fn from_config(config: &CodecConfig) -> Self {
        let codec = Self::new();
        if config.autoseal {
            codec.state.lock().seal = SealState::AutosealPending;
        }
        codec
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a concrete type under a TypeURL
    ///
    /// A pointer to a concrete type registers the pointee and marks it
    /// pointer-preferred.
    ///
    /// # Errors
    /// Any [`SchemaError`]: the codec is sealed, the target is an interface,
    /// a pointer-to-pointer or a pointer-to-interface, the URL has no `/`,
    /// the type or its name is already taken, or its descriptor is invalid.
    /// A failed registration inserts nothing for the failing type.
    pub fn register_type(&self, ty: Type, type_url: &str) -> SchemaResult<()> {
        let mut state = self.state.lock();
        self.register_type_locked(&mut state, ty, type_url)
            .inspect_err(|e| warn!("Rejected registration of {}: {}", ty, e))
    }

    /// Register `T` under a TypeURL
    pub fn register<T: ?Sized + Reflect>(&self, type_url: &str) -> SchemaResult<()> {
        self.register_type(T::type_of(), type_url)
    }

    /// Register a member of `package`, using the package's TypeURL for it
    pub fn register_type_from(&self, ty: Type, package: &dyn Package) -> SchemaResult<()> {
        if !package.has_type(ty)? {
            return Err(SchemaError::NotInPackage {
                ty: ty.name(),
                package: package.name().to_string(),
            });
        }
        let type_url = package.type_url_for(ty);
        self.register_type(ty, &type_url)
    }

    /// Register every type of `package`
    ///
    /// Stops at the first failure; types registered before it stay registered.
    pub fn register_package(&self, package: &dyn Package) -> SchemaResult<()> {
        if self.is_sealed() {
            return Err(SchemaError::Sealed);
        }
        let types = package.types();
        for ty in &types {
            self.register_type_from(*ty, package)?;
        }
        debug!(
            "Registered package {} ({} types)",
            package.name(),
            types.len()
        );
        Ok(())
    }

    fn register_type_locked(
        &self,
        state: &mut RegistryState,
        ty: Type,
        type_url: &str,
    ) -> SchemaResult<()> {
        if state.seal == SealState::Sealed {
            return Err(SchemaError::Sealed);
        }

        let (canonical, pointer_preferred) = if ty.is_pointer() {
            let elem = ty.deref();
            if ty.depth() > 1 {
                return Err(SchemaError::PointerToPointer(elem.pointer_to().name()));
            }
            if elem.is_interface() {
                return Err(SchemaError::PointerToInterface(elem.name()));
            }
            (elem, true)
        } else {
            (ty, false)
        };
        if canonical.is_interface() {
            return Err(SchemaError::NotConcrete(canonical.name()));
        }

        let name = name_from_url(type_url)?;
        if state.type_infos.contains_key(&canonical) {
            return Err(SchemaError::DuplicateType(canonical.name()));
        }
        if let Some(existing) = state.name_infos.get(name) {
            return Err(SchemaError::DuplicateName {
                name: name.to_string(),
                existing: existing.ty.name(),
            });
        }

        let mut info = self.derive_type_info(state, canonical)?;
        // Element derivation may have cached the type itself
        if state.type_infos.contains_key(&canonical) {
            return Err(SchemaError::DuplicateType(canonical.name()));
        }
        info.concrete.registered = true;
        info.concrete.pointer_preferred = pointer_preferred;
        info.concrete.type_url = Some(type_url.to_string());

        let info = Arc::new(info);
        state.type_infos.insert(canonical, Arc::clone(&info));
        state.name_infos.insert(name.to_string(), info);

        debug!(
            "Registered {} as {} (pointer preferred: {})",
            canonical, name, pointer_preferred
        );
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Get the descriptor of a type, deriving and caching it if unknown
    ///
    /// Pointer indirection is stripped first. Lazily derived descriptors are
    /// never registered and cannot serve polymorphic decode.
    pub fn type_info(&self, ty: Type) -> SchemaResult<Arc<TypeInfo>> {
        let mut state = self.state.lock();
        self.type_info_locked(&mut state, ty)
    }

    /// Get the descriptor of `T`
    pub fn type_info_of<T: ?Sized + Reflect>(&self) -> SchemaResult<Arc<TypeInfo>> {
        self.type_info(T::type_of())
    }

    /// Resolve a registered short name
    ///
    /// The proto timestamp and duration names resolve to the native
    /// [`SystemTime`] and [`Duration`] descriptors unless
    /// `opts.use_google_types` is set.
    ///
    /// # Errors
    /// [`LookupError::UnrecognizedName`] when nothing is registered under
    /// `name`. The codec stays fully usable afterwards.
    pub fn type_info_by_name(
        &self,
        name: &str,
        opts: &FieldOptions,
    ) -> Result<Arc<TypeInfo>, LookupError> {
        let mut state = self.state.lock();

        if !opts.use_google_types {
            let native = match name {
                TIMESTAMP_NAME => Some(Type::of::<SystemTime>()),
                DURATION_NAME => Some(Type::of::<Duration>()),
                _ => None,
            };
            if let Some(ty) = native {
                return Ok(self.type_info_locked(&mut state, ty)?);
            }
        }

        match state.name_infos.get(name) {
            Some(info) => {
                trace!("Resolved name {} to {}", name, info.ty);
                Ok(Arc::clone(info))
            }
            None => Err(LookupError::UnrecognizedName(name.to_string())),
        }
    }

    /// Resolve a TypeURL by its short name
    ///
    /// # Errors
    /// [`LookupError::Schema`] for a URL without `/`, otherwise as
    /// [`type_info_by_name`](Self::type_info_by_name).
    pub fn type_info_by_url(
        &self,
        type_url: &str,
        opts: &FieldOptions,
    ) -> Result<Arc<TypeInfo>, LookupError> {
        let name = name_from_url(type_url)?;
        self.type_info_by_name(name, opts)
    }

    /// Resolve the element descriptor of an array or slice descriptor
    pub fn elem_type_info(&self, info: &TypeInfo) -> SchemaResult<Option<Arc<TypeInfo>>> {
        match info.concrete.elem {
            Some(elem) => self.type_info(elem).map(Some),
            None => Ok(None),
        }
    }

    /// Whether values of the type are encoded as an (implicit) struct
    ///
    /// True for records, and for lists whose elements are length-delimited.
    pub fn is_struct_or_unpacked(&self, info: &TypeInfo, opts: &FieldOptions) -> SchemaResult<bool> {
        if matches!(info.ty.kind(), Kind::Struct(_)) {
            return Ok(true);
        }
        match self.elem_type_info(info)? {
            Some(elem) => Ok(elem.typ3(opts)? == Typ3::ByteLength),
            None => Ok(false),
        }
    }

    fn type_info_locked(
        &self,
        state: &mut RegistryState,
        ty: Type,
    ) -> SchemaResult<Arc<TypeInfo>> {
        let ty = ty.deref();
        if let Some(info) = state.type_infos.get(&ty) {
            trace!("TypeInfo cache hit for {}", ty);
            return Ok(Arc::clone(info));
        }

        let info = Arc::new(self.derive_type_info(state, ty)?);
        state.type_infos.insert(ty, Arc::clone(&info));
        debug!("Derived unregistered TypeInfo for {}", ty);
        Ok(info)
    }

    /// Build an unregistered descriptor for a canonical type
    ///
    /// List element descriptors are resolved (and cached) first.
    fn derive_type_info(&self, state: &mut RegistryState, ty: Type) -> SchemaResult<TypeInfo> {
        let mut info = TypeInfo {
            ty,
            ptr_to_type: ty.pointer_to(),
            zero: ty.zero(),
            concrete: ConcreteInfo::default(),
            structure: StructInfo::default(),
        };

        let kind = ty.kind();
        if let Kind::Struct(fields) = &kind {
            info.structure = parse_struct_info(ty, fields)?;
        }

        let hooks = detect_hooks(ty)?;
        info.concrete.marshal_repr = hooks.marshal_repr;
        info.concrete.unmarshal_repr = hooks.unmarshal_repr;

        let mut well_known = WellKnownFlags::empty();
        well_known.set(WellKnownFlags::BINARY, self.well_known.is_binary_well_known(ty));
        well_known.set(WellKnownFlags::JSON, self.well_known.is_json_well_known(ty));
        well_known.set(
            WellKnownFlags::JSON_ANY_VALUE,
            self.well_known.is_json_any_value(ty),
        );
        info.concrete.well_known = well_known;

        if kind.is_list() {
            if let Some(elem) = ty.elem() {
                let elem_info = self.type_info_locked(state, elem)?;
                info.concrete.elem = Some(elem_info.ty);
            }
        }

        Ok(info)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Permanently seal the codec; further registration fails
    pub fn seal(&self) -> &Self {
        let mut state = self.state.lock();
        if state.seal != SealState::Sealed {
            debug!("Codec sealed ({} registered types)", state.name_infos.len());
        }
        state.seal = SealState::Sealed;
        self
    }

    /// Request a seal on the next [`finalize`](Self::finalize)
    ///
    /// # Errors
    /// [`SchemaError::AlreadySealed`] if the codec is sealed.
    pub fn autoseal(&self) -> SchemaResult<&Self> {
        let mut state = self.state.lock();
        if state.seal == SealState::Sealed {
            return Err(SchemaError::AlreadySealed);
        }
        state.seal = SealState::AutosealPending;
        debug!("Autoseal requested");
        Ok(self)
    }

    /// Convert a pending autoseal into a seal
    ///
    /// Called by the traversal layer at its checkpoint. Returns whether this
    /// call sealed the codec.
    pub fn finalize(&self) -> bool {
        let mut state = self.state.lock();
        if state.seal == SealState::AutosealPending {
            state.seal = SealState::Sealed;
            debug!("Codec autosealed ({} registered types)", state.name_infos.len());
            true
        } else {
            false
        }
    }

    /// Current lifecycle state
    pub fn seal_state(&self) -> SealState {
        self.state.lock().seal
    }

    pub fn is_sealed(&self) -> bool {
        self.seal_state() == SealState::Sealed
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of cached descriptors (registered or not)
    pub fn len(&self) -> usize {
        self.state.lock().type_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short names of all registered types, sorted
    pub fn registered_names(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut names: Vec<String> = state.name_infos.keys().cloned().collect();
        names.sort();
        names
    }

    /// Write a markdown table of all cached descriptors
    ///
    /// Documentation output only; the length column is a heuristic.
    pub fn print_types<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        let infos: Vec<Arc<TypeInfo>> = {
            let state = self.state.lock();
            state.type_infos.values().cloned().collect()
        };
        print::write_type_table(out, infos)
    }
}
