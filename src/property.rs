use std::{
    any::{Any, type_name},
    marker::PhantomData,
    ops::{Deref, DerefMut, Index, IndexMut},
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, warn};

use crate::element::{EH, FH, HH, Handle, VH};

/// Types that can be stored in a property.
pub trait TPropData: Clone + 'static {}

impl<T> TPropData for T where T: Clone + 'static {}

/// Ids are unique across all containers, so a key never matches a different
/// property that later reuses its slot.
static NEXT_PROPERTY_ID: AtomicU64 = AtomicU64::new(1);

/// A named, type erased array of values parallel to the table of elements `H`.
trait GenericProperty<H>
where
    H: Handle,
{
    fn name(&self) -> &str;

    fn id(&self) -> u64;

    fn type_name(&self) -> &'static str;

    fn reserve(&mut self, n: usize);

    fn resize(&mut self, n: usize);

    fn free_memory(&mut self);

    fn push(&mut self);

    fn push_many(&mut self, num: usize);

    fn swap(&mut self, i: usize, j: usize);

    fn copy(&mut self, src: usize, dst: usize);

    fn clone_boxed(&self) -> Box<dyn GenericProperty<H>>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct PropertyArray<H, T>
where
    H: Handle,
    T: TPropData,
{
    name: String,
    id: u64,
    default: T,
    buf: PropBuf<H, T>,
}

impl<H, T> GenericProperty<H> for PropertyArray<H, T>
where
    H: Handle,
    T: TPropData,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn reserve(&mut self, n: usize) {
        self.buf.buf.reserve(n);
    }

    fn resize(&mut self, n: usize) {
        self.buf.buf.resize(n, self.default.clone());
    }

    fn free_memory(&mut self) {
        self.buf.buf.shrink_to_fit();
    }

    fn push(&mut self) {
        self.buf.buf.push(self.default.clone());
    }

    fn push_many(&mut self, num: usize) {
        let n = self.buf.buf.len() + num;
        self.buf.buf.resize(n, self.default.clone());
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.buf.buf.swap(i, j);
    }

    fn copy(&mut self, src: usize, dst: usize) {
        self.buf.buf[dst] = self.buf.buf[src].clone();
    }

    fn clone_boxed(&self) -> Box<dyn GenericProperty<H>> {
        Box::new(PropertyArray::<H, T> {
            name: self.name.clone(),
            id: self.id,
            default: self.default.clone(),
            buf: PropBuf {
                buf: self.buf.buf.clone(),
                _phantom: PhantomData,
            },
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A set of named properties defined on one kind of mesh element.
///
/// Every array in the container has the same length, and all of them grow,
/// shrink and swap rows together. The container owns the arrays; a
/// [`Property<H, T>`] is only a key used to look them up.
pub struct PropertyContainer<H>
where
    H: Handle,
{
    slots: Vec<Option<Box<dyn GenericProperty<H>>>>,
    length: usize,
}

impl<H> Default for PropertyContainer<H>
where
    H: Handle,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for PropertyContainer<H>
where
    H: Handle,
{
    /// Deep copy of all arrays. Keys of this container remain valid for the copy.
    fn clone(&self) -> Self {
        PropertyContainer {
            slots: self
                .slots
                .iter()
                .map(|slot| slot.as_ref().map(|prop| prop.clone_boxed()))
                .collect(),
            length: self.length,
        }
    }
}

impl<H> PropertyContainer<H>
where
    H: Handle,
{
    pub fn new() -> Self {
        PropertyContainer {
            slots: Vec::new(),
            length: 0,
        }
    }

    fn live(&self) -> impl Iterator<Item = &dyn GenericProperty<H>> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    fn live_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn GenericProperty<H>>> {
        self.slots.iter_mut().filter_map(|slot| slot.as_mut())
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|prop| prop.name() == name))
    }

    fn lookup<T: TPropData>(&self, prop: &Property<H, T>) -> Option<&PropertyArray<H, T>> {
        self.slots
            .get(prop.slot as usize)?
            .as_ref()
            .filter(|p| p.id() == prop.id)?
            .as_any()
            .downcast_ref::<PropertyArray<H, T>>()
    }

    fn lookup_mut<T: TPropData>(
        &mut self,
        prop: &Property<H, T>,
    ) -> Option<&mut PropertyArray<H, T>> {
        self.slots
            .get_mut(prop.slot as usize)?
            .as_mut()
            .filter(|p| p.id() == prop.id)?
            .as_any_mut()
            .downcast_mut::<PropertyArray<H, T>>()
    }

    /// Add a new property called `name`, with every present element set to
    /// `default`. If a property with the same name already exists, nothing
    /// is added and an invalid key is returned.
    pub fn add<T: TPropData>(&mut self, name: &str, default: T) -> Property<H, T> {
        if self.find(name).is_some() {
            warn!(name, kind = %H::KIND, "A property with this name already exists");
            return Property::invalid();
        }
        let id = NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed);
        let array = Box::new(PropertyArray::<H, T> {
            name: name.to_string(),
            id,
            buf: PropBuf {
                buf: vec![default.clone(); self.length],
                _phantom: PhantomData,
            },
            default,
        });
        let slot = match self.slots.iter().position(|slot| slot.is_none()) {
            Some(slot) => {
                self.slots[slot] = Some(array);
                slot
            }
            None => {
                self.slots.push(Some(array));
                self.slots.len() - 1
            }
        };
        Property::new(slot as u32, id)
    }

    /// Look up the property called `name`. The returned key is invalid if no
    /// such property exists, or if its values are not of type `T`.
    pub fn get<T: TPropData>(&self, name: &str) -> Property<H, T> {
        let Some(slot) = self.find(name) else {
            return Property::invalid();
        };
        match self.slots[slot].as_deref() {
            Some(prop) if prop.as_any().is::<PropertyArray<H, T>>() => {
                Property::new(slot as u32, prop.id())
            }
            Some(prop) => {
                debug!(
                    name,
                    stored = prop.type_name(),
                    requested = type_name::<T>(),
                    "Property type mismatch"
                );
                Property::invalid()
            }
            None => Property::invalid(),
        }
    }

    /// Like [`get`](Self::get), but adds the property if it doesn't exist.
    pub fn get_or_add<T: TPropData>(&mut self, name: &str, default: T) -> Property<H, T> {
        if self.find(name).is_some() {
            self.get(name)
        } else {
            self.add(name, default)
        }
    }

    /// Remove the property referred to by `prop` and invalidate the key.
    /// Returns `false` if the key didn't refer to a live property.
    pub fn remove<T: TPropData>(&mut self, prop: &mut Property<H, T>) -> bool {
        let removed = self.lookup(prop).is_some();
        if removed {
            self.slots[prop.slot as usize] = None;
        }
        *prop = Property::invalid();
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// The name of the value type of the property called `name`.
    pub fn type_name(&self, name: &str) -> Option<&'static str> {
        self.find(name)
            .and_then(|slot| self.slots[slot].as_deref())
            .map(|prop| prop.type_name())
    }

    /// Names of all properties in the order of their slots.
    pub fn property_names(&self) -> Vec<&str> {
        self.live().map(|prop| prop.name()).collect()
    }

    pub fn num_properties(&self) -> usize {
        self.live().count()
    }

    /// Read-only access to the values of `prop`. `None` if the key is stale.
    pub fn buf<T: TPropData>(&self, prop: Property<H, T>) -> Option<&PropBuf<H, T>> {
        self.lookup(&prop).map(|array| &array.buf)
    }

    /// Mutable access to the values of `prop`. `None` if the key is stale.
    pub fn buf_mut<T: TPropData>(&mut self, prop: Property<H, T>) -> Option<&mut PropBuf<H, T>> {
        self.lookup_mut(&prop).map(|array| &mut array.buf)
    }

    /// Number of elements, which is the length of every array.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /**
     * Reserve memory to accomodate an additional `n` elements.
     */
    pub fn reserve(&mut self, n: usize) {
        for prop in self.live_mut() {
            prop.reserve(n);
        }
    }

    pub fn resize(&mut self, n: usize) {
        for prop in self.live_mut() {
            prop.resize(n);
        }
        self.length = n;
    }

    /// Remove all properties and all elements.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.length = 0;
    }

    /// Release unused capacity in every array.
    pub fn free_memory(&mut self) {
        for prop in self.live_mut() {
            prop.free_memory();
        }
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        self.slots.shrink_to_fit();
    }

    /// Append one element, initialized to the default of each property.
    pub fn push_value(&mut self) {
        for prop in self.live_mut() {
            prop.push();
        }
        self.length += 1;
    }

    pub fn push_values(&mut self, num: usize) {
        for prop in self.live_mut() {
            prop.push_many(num);
        }
        self.length += num;
    }

    /// Swap the values of the elements at `i` and `j` in every property.
    pub fn swap(&mut self, i: usize, j: usize) {
        for prop in self.live_mut() {
            prop.swap(i, j);
        }
    }

    /// Copy the values of element `src` to element `dst` in every property.
    pub fn copy(&mut self, src: H, dst: H) {
        let (src, dst) = (src.index() as usize, dst.index() as usize);
        for prop in self.live_mut() {
            prop.copy(src, dst);
        }
    }
}

/// Buffer holding the values of a property, one per element.
///
/// It can be indexed with handles, and it dereferences to a slice.
#[derive(Clone, Debug)]
pub struct PropBuf<H, T>
where
    H: Handle,
{
    buf: Vec<T>,
    _phantom: PhantomData<H>,
}

impl<H, T> PropBuf<H, T>
where
    H: Handle,
    T: Clone,
{
    pub(crate) fn new() -> Self {
        PropBuf {
            buf: Vec::new(),
            _phantom: PhantomData,
        }
    }

    pub(crate) fn with_capacity(n: usize) -> Self {
        PropBuf {
            buf: Vec::with_capacity(n),
            _phantom: PhantomData,
        }
    }

    pub(crate) fn push(&mut self, val: T) {
        self.buf.push(val);
    }

    pub(crate) fn reserve(&mut self, n: usize) {
        self.buf.reserve(n);
    }

    pub(crate) fn resize(&mut self, n: usize, val: T) {
        self.buf.resize(n, val);
    }

    pub(crate) fn clear(&mut self) {
        self.buf.clear();
    }

    pub(crate) fn free_memory(&mut self) {
        self.buf.shrink_to_fit();
    }
}

impl<H, T> Index<H> for PropBuf<H, T>
where
    H: Handle,
{
    type Output = T;

    fn index(&self, index: H) -> &Self::Output {
        &self.buf[index.index() as usize]
    }
}

impl<H, T> IndexMut<H> for PropBuf<H, T>
where
    H: Handle,
{
    fn index_mut(&mut self, index: H) -> &mut Self::Output {
        &mut self.buf[index.index() as usize]
    }
}

impl<H, T> Deref for PropBuf<H, T>
where
    H: Handle,
{
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<H, T> DerefMut for PropBuf<H, T>
where
    H: Handle,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

/// A key referring to a property defined on the elements of the mesh. `T` is
/// the type of data associated with each element of the mesh, whose handle
/// type is `H`.
///
/// Why use properties instead of simple [`Vec<T>`] to associate values with
/// elements of a mesh? If you modify the mesh, by either adding new elements
/// or by deleting elements and garbage collecting, a [`Vec<T>`] will go out of
/// sync with the mesh. Properties are resized and reordered together with the
/// elements, so every element of type `H`, even the newly added ones, has a
/// value associated with it.
///
/// The key does not own the values. Lookups with a key whose property was
/// removed, or which was never valid, fail softly.
pub struct Property<H, T> {
    slot: u32,
    id: u64,
    _phantom: PhantomData<fn() -> (H, T)>,
}

impl<H, T> Clone for Property<H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, T> Copy for Property<H, T> {}

impl<H, T> PartialEq for Property<H, T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.id == other.id
    }
}

impl<H, T> Eq for Property<H, T> {}

impl<H, T> std::fmt::Debug for Property<H, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "Property({}, {})", self.slot, self.id)
        } else {
            write!(f, "Property(invalid)")
        }
    }
}

impl<H, T> Property<H, T> {
    fn new(slot: u32, id: u64) -> Self {
        Property {
            slot,
            id,
            _phantom: PhantomData,
        }
    }

    /// A key that doesn't refer to any property.
    pub fn invalid() -> Self {
        Property::new(u32::MAX, 0)
    }

    /// Whether this key was produced by a successful lookup or insertion. A
    /// valid key can still go stale if its property is removed.
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// Whether both keys refer to the same property. Ids are never reused,
    /// so keys of different element or value types never match.
    pub(crate) fn same_as<G, U>(&self, other: &Property<G, U>) -> bool {
        self.is_valid() && self.slot == other.slot && self.id == other.id
    }
}

/// Vertex property. A value of type `T` is defined on each vertex of the
/// mesh.
///
/// ```rust
/// use halfmesh::{use_glam::PolyMeshF32, VProperty, VH};
///
/// let mut mesh = PolyMeshF32::tetrahedron(1.0).expect("Cannot create a tetrahedron");
/// // Create a vertex property of type u32, with a default value of 42.
/// let vprop: VProperty<u32> = mesh.add_property("v:answer", 42u32);
/// let v = VH::from(2);
/// let values = mesh.prop(vprop).expect("Cannot read vertex property");
/// assert_eq!(42, values[v]);
/// ```
pub type VProperty<T> = Property<VH, T>;

/// Halfedge property. A value of type `T` is defined on each halfedge of the
/// mesh.
pub type HProperty<T> = Property<HH, T>;

/// Edge property. A value of type `T` is defined on each edge of the mesh.
pub type EProperty<T> = Property<EH, T>;

/// Face property. A value of type `T` is defined on each face of the mesh.
///
/// ```rust
/// use halfmesh::{use_glam::PolyMeshF32, FProperty, FH};
///
/// let mut mesh = PolyMeshF32::hexahedron(1.0).expect("Cannot create a box");
/// let mut fprop: FProperty<u8> = mesh.add_property("f:tag", 0u8);
/// mesh.prop_mut(fprop).expect("Cannot write face property")[FH::from(3)] = 7;
/// assert_eq!(mesh.prop(fprop).expect("Cannot read face property")[FH::from(3)], 7);
/// assert!(mesh.remove_property(&mut fprop));
/// assert!(!fprop.is_valid());
/// ```
pub type FProperty<T> = Property<FH, T>;

/// Buffer containing the values of a vertex property.
pub type VPropBuf<T> = PropBuf<VH, T>;

/// Buffer containing the values of a halfedge property.
pub type HPropBuf<T> = PropBuf<HH, T>;

/// Buffer containing the values of a edge property.
pub type EPropBuf<T> = PropBuf<EH, T>;

/// Buffer containing the values of a face property.
pub type FPropBuf<T> = PropBuf<FH, T>;

#[cfg(test)]
mod test {
    use super::{PropertyContainer, VProperty};
    use crate::element::VH;

    fn container(n: usize) -> PropertyContainer<VH> {
        let mut container = PropertyContainer::new();
        container.push_values(n);
        container
    }

    #[test]
    fn t_add_and_get() {
        let mut container = container(3);
        let prop = container.add("v:weight", 1.5f32);
        assert!(prop.is_valid());
        let buf = container.buf(prop).expect("Cannot read property");
        assert_eq!(buf.len(), 3);
        assert!(buf.iter().all(|w| *w == 1.5));
        let found: VProperty<f32> = container.get("v:weight");
        assert_eq!(found, prop);
        let missing: VProperty<f32> = container.get("v:missing");
        assert!(!missing.is_valid());
        assert!(container.buf(missing).is_none());
    }

    #[test]
    fn t_duplicate_name() {
        let mut container = container(2);
        let first = container.add("v:flag", false);
        let second = container.add("v:flag", true);
        assert!(first.is_valid());
        assert!(!second.is_valid());
        assert_eq!(container.num_properties(), 1);
        // The original values are untouched.
        assert!(!container.buf(first).expect("Cannot read property")[VH::from(1)]);
    }

    #[test]
    fn t_type_mismatch() {
        let mut container = container(4);
        container.add("v:index", 0u32);
        let wrong: VProperty<i64> = container.get("v:index");
        assert!(!wrong.is_valid());
        let right: VProperty<u32> = container.get("v:index");
        assert!(right.is_valid());
        assert!(container.type_name("v:index").is_some_and(|t| t.contains("u32")));
    }

    #[test]
    fn t_get_or_add() {
        let mut container = container(2);
        let a = container.get_or_add("v:label", String::from("none"));
        let b = container.get_or_add("v:label", String::from("other"));
        assert_eq!(a, b);
        assert_eq!(container.num_properties(), 1);
        assert_eq!(container.buf(b).expect("Cannot read property")[VH::from(0)], "none");
    }

    #[test]
    fn t_remove() {
        let mut container = container(5);
        let before = container.num_properties();
        let mut prop = container.add("v:temp", 0u8);
        assert_eq!(container.num_properties(), before + 1);
        let copy = prop;
        assert!(container.remove(&mut prop));
        assert!(!prop.is_valid());
        assert_eq!(container.num_properties(), before);
        assert!(!container.contains("v:temp"));
        // Stale copies of the key no longer resolve.
        assert!(container.buf(copy).is_none());
        let mut copy = copy;
        assert!(!container.remove(&mut copy));
        // A new property reusing the slot is not reachable through the old key.
        let other = container.add("v:other", 0u8);
        assert!(other.is_valid());
        assert!(container.buf(copy).is_none());
        assert_eq!(container.property_names(), vec!["v:other"]);
    }

    #[test]
    fn t_growth_uses_default() {
        let mut container = container(2);
        let prop = container.add("v:count", 7i32);
        container.buf_mut(prop).expect("Cannot write property")[VH::from(0)] = 1;
        container.push_value();
        container.push_values(2);
        assert_eq!(container.len(), 5);
        assert_eq!(
            container.buf(prop).expect("Cannot read property").to_vec(),
            vec![1, 7, 7, 7, 7]
        );
        container.resize(1);
        assert_eq!(container.buf(prop).expect("Cannot read property").len(), 1);
        container.resize(3);
        assert_eq!(
            container.buf(prop).expect("Cannot read property").to_vec(),
            vec![1, 7, 7]
        );
    }

    #[test]
    fn t_swap_and_copy() {
        let mut container = container(3);
        let a = container.add("v:a", 0u32);
        let b = container.add("v:b", 'x');
        {
            let buf = container.buf_mut(a).expect("Cannot write property");
            for (i, v) in buf.iter_mut().enumerate() {
                *v = i as u32;
            }
        }
        container.buf_mut(b).expect("Cannot write property")[VH::from(2)] = 'z';
        container.swap(0, 2);
        assert_eq!(container.buf(a).expect("Cannot read property").to_vec(), vec![2, 1, 0]);
        assert_eq!(container.buf(b).expect("Cannot read property").to_vec(), vec!['z', 'x', 'x']);
        container.copy(0.into(), 1.into());
        assert_eq!(container.buf(a).expect("Cannot read property").to_vec(), vec![2, 2, 0]);
        assert_eq!(container.buf(b).expect("Cannot read property").to_vec(), vec!['z', 'z', 'x']);
    }

    #[test]
    fn t_deep_copy() {
        let mut container = container(2);
        let prop = container.add("v:values", vec![1u8, 2]);
        let mut copy = container.clone();
        copy.buf_mut(prop).expect("Cannot write property")[VH::from(0)].push(3);
        copy.push_value();
        assert_eq!(container.buf(prop).expect("Cannot read property")[VH::from(0)], vec![1, 2]);
        assert_eq!(container.len(), 2);
        assert_eq!(copy.buf(prop).expect("Cannot read property")[VH::from(0)], vec![1, 2, 3]);
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn t_clear_and_free_memory() {
        let mut container = container(10);
        let mut a = container.add("v:a", 0u64);
        container.add("v:b", 0u64);
        container.remove(&mut a);
        container.free_memory();
        assert_eq!(container.num_properties(), 1);
        assert_eq!(container.len(), 10);
        container.clear();
        assert_eq!(container.num_properties(), 0);
        assert!(container.is_empty());
    }
}
