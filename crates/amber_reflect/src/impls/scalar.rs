use crate::impls::TypeInfoCell;
use crate::info::{Described, ScalarInfo, TypeInfo};
use crate::ops::{ShapeMut, ShapeRef};
use crate::registry::{Registrable, TextConverter, TypeEntry};
use crate::{Amber, Named, Shape, TypeRef, TEXT_TYPE};

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Named for $ty {
                #[inline]
                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }

            impl Described for $ty {
                fn type_info() -> &'static TypeInfo {
                    static CELL: TypeInfoCell = TypeInfoCell::new();
                    CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<$ty>()))
                }
            }

            impl Amber for $ty {
                #[inline]
                fn type_ref(&self) -> TypeRef {
                    TypeRef::of::<Self>()
                }

                #[inline]
                fn info(&self) -> &'static TypeInfo {
                    <Self as Described>::type_info()
                }

                #[inline]
                fn shape(&self) -> Shape {
                    Shape::Scalar
                }

                #[inline]
                fn shape_ref(&self) -> ShapeRef<'_> {
                    ShapeRef::Scalar(self)
                }

                #[inline]
                fn shape_mut(&mut self) -> ShapeMut<'_> {
                    ShapeMut::Scalar(self)
                }

                fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
                    *self = *value.downcast::<Self>()?;
                    Ok(())
                }
            }

            impl Registrable for $ty {
                fn type_entry() -> TypeEntry {
                    TypeEntry::of::<$ty>()
                }

                fn converter() -> Option<TextConverter> {
                    Some(TextConverter::of::<$ty>())
                }
            }
        )*
    };
}

impl_scalar!(
    bool, char, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize, f32, f64,
);

// String gets a manual implementation: its wire name is the distinguished
// text type and empty strings are treated as absent by serializers.

impl Named for String {
    #[inline]
    fn type_name() -> &'static str {
        TEXT_TYPE
    }
}

impl Described for String {
    fn type_info() -> &'static TypeInfo {
        static CELL: TypeInfoCell = TypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<String>()))
    }
}

impl Amber for String {
    #[inline]
    fn type_ref(&self) -> TypeRef {
        TypeRef::text()
    }

    #[inline]
    fn info(&self) -> &'static TypeInfo {
        <Self as Described>::type_info()
    }

    #[inline]
    fn shape(&self) -> Shape {
        Shape::Scalar
    }

    #[inline]
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::Scalar(self)
    }

    #[inline]
    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Scalar(self)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    fn set(&mut self, value: Box<dyn Amber>) -> Result<(), Box<dyn Amber>> {
        *self = *value.downcast::<Self>()?;
        Ok(())
    }
}

impl Registrable for String {
    fn type_entry() -> TypeEntry {
        TypeEntry::of::<String>()
    }

    fn converter() -> Option<TextConverter> {
        Some(TextConverter::of::<String>())
    }
}
