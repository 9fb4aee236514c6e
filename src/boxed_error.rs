/// Define an error type `Foo` as a wrapper around a `Box<FooKind>`,
/// which keeps `Result<T, Foo>` one pointer wide. `Foo` derefs to
/// `FooKind`, converts from anything `FooKind` converts from (hence
/// `thiserror`'s `#[from]` on the kind still works with `?`), and
/// forwards `Display` and `source`. `FooKind` has to be defined
/// separately.
#[macro_export]
macro_rules! def_boxed_error {
    ($wrappername:ident, $kindname:ident) => {

        #[derive(Debug)]
        pub struct $wrappername(Box<$kindname>);

        impl $wrappername {
            pub fn kind(&self) -> &$kindname {
                &*self.0
            }

            pub fn into_kind(self) -> $kindname {
                *self.0
            }
        }

        impl std::ops::Deref for $wrappername {
            type Target = $kindname;

            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl<E> From<E> for $wrappername where $kindname: From<E> {
            fn from(err: E) -> Self {
                $wrappername(Box::new($kindname::from(err)))
            }
        }

        impl std::error::Error for $wrappername {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                self.0.source()
            }
        }

        impl std::fmt::Display for $wrappername {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                // Calling through the trait path, `self.0.fmt` is
                // ambiguous with Debug in scope.
                std::fmt::Display::fmt(&*self.0, f)
            }
        }
    }
}


/// Defines both an error kind (deriving `thiserror::Error`) and its
/// box wrapper as per `def_boxed_error`, keeping the definition site
/// uncluttered.
#[macro_export]
macro_rules! def_boxed_thiserror {
    ($wrappername:ident, $key1:tt $kindname:ident {$($body:tt)*}) => {
        $crate::_def_boxed_thiserror!($wrappername, $kindname, $key1 $kindname {
            $($body)*
        });
    };
    ($wrappername:ident, $key1:tt $key2:tt $kindname:ident {$($body:tt)*}) => {
        $crate::_def_boxed_thiserror!($wrappername, $kindname, $key1 $key2 $kindname {
            $($body)*
        });
    };
}

#[macro_export]
macro_rules! _def_boxed_thiserror {
    (
        $wrappername:ident,
        $kindname:ident,
        $($innerdef:tt)*
    ) => {
        #[derive(thiserror::Error, Debug)]
        $($innerdef)*

        $crate::def_boxed_error!($wrappername, $kindname);
    }
}
