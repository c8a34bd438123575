use slab::Slab;
use static_assertions::const_assert_eq;
use std::{
    mem,
    num::NonZeroU32,
    ops::{Index, IndexMut},
};

/// An opaque number that uniquely identifies the value stored in a given [`Allocator32`].
///
/// An `Option<AllocId32>` still only requires 32 bits.
pub type AllocId32 = NonZeroU32;

const_assert_eq!(
    mem::size_of::<Option<AllocId32>>(),
    mem::size_of::<AllocId32>()
);

/// An append-only arena of up to `u32::MAX - 1` values of type `T`, indexed by 32-bit [`AllocId32`].
///
/// Values live until the allocator is dropped. There is no removal, so an [`AllocId32`] handed out by [`insert`](Self::insert)
/// stays valid for the lifetime of the allocator.
pub struct Allocator32<T> {
    values: Slab<T>,
}

impl<T> Default for Allocator32<T> {
    fn default() -> Self {
        Self { values: Slab::new() }
    }
}

impl<T> Allocator32<T> {
    #[inline]
    pub fn get(&self, id: AllocId32) -> Option<&T> {
        self.values.get(Self::id_to_index(id))
    }

    #[inline]
    pub fn get_mut(&mut self, id: AllocId32) -> Option<&mut T> {
        self.values.get_mut(Self::id_to_index(id))
    }

    #[inline]
    pub fn insert(&mut self, value: T) -> AllocId32 {
        let index = self.values.insert(value);
        Self::index_to_id(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AllocId32, &T)> {
        self.values
            .iter()
            .map(|(index, value)| (Self::index_to_id(index), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AllocId32, &mut T)> {
        self.values
            .iter_mut()
            .map(|(index, value)| (Self::index_to_id(index), value))
    }

    const MAX_VALID_INDEX: usize = (u32::MAX - 1) as usize;

    const fn id_to_index(id: AllocId32) -> usize {
        // XOR is used to flip all of the bits of id so that u32::MAX is mapped to zero (a valid slab index).
        (id.get() ^ u32::MAX) as usize
    }

    fn index_to_id(index: usize) -> AllocId32 {
        assert!(index <= Self::MAX_VALID_INDEX);
        // XOR maps every index <= MAX_VALID_INDEX to a nonzero id.
        AllocId32::new((index as u32) ^ u32::MAX).unwrap_or(AllocId32::MAX)
    }
}

impl<T> Index<AllocId32> for Allocator32<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: AllocId32) -> &Self::Output {
        self.values.index(Self::id_to_index(id))
    }
}

impl<T> IndexMut<AllocId32> for Allocator32<T> {
    #[inline]
    fn index_mut(&mut self, id: AllocId32) -> &mut Self::Output {
        self.values.index_mut(Self::id_to_index(id))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
