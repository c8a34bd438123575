macro_rules! def_units {
    ($t: ident, $doc: literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $t<T>(pub T);

        impl<T> $t<T> {
            pub fn into_inner(self) -> T {
                self.0
            }

            pub fn map<S>(self, mut f: impl FnMut(T) -> S) -> $t<S> {
                $t(f(self.0))
            }

            pub fn combine<S, R>(u1: Self, u2: $t<S>, mut f: impl FnMut(T, S) -> R) -> $t<R> {
                $t(f(u1.into_inner(), u2.into_inner()))
            }
        }

        impl<T: Eq> Eq for $t<T> {}
    };
}

def_units!(
    WorldUnits,
    "Denotes that the inner `T` is given in world units, where one segment spans `resolution` units."
);
def_units!(
    SegmentUnits,
    "Denotes that the inner `T` is given in segment grid units. Lattice (base point) coordinates share this scale."
);
