//! C ABI for consuming analyzers across a shared-library boundary.
//!
//! Analyzers are handed out as opaque `AnalyzerHandle` pointers. Every entry
//! point returns an [`AnalyzerStatus`] code; panics never unwind into the
//! caller. A handle obtained from a factory must be passed to
//! [`analyzer_release`] exactly once.

use std::ffi::{CStr, c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::{
    error::{AnalyzerError, AnalyzerStatus, Result},
    handle::AnalyzerHandle,
    parameter::{AnalyzerParameter, ParameterValue},
    registry::create_fiber_analyzer,
    traits::Analyzer,
    types::{Point, Size},
};

/// X/Y coordinates of a point within an image
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImPoint {
    pub xy_coords: [c_int; 2],
}

/// X/Y dimensions of an image or sub-image
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImSize {
    pub xy_dims: [c_int; 2],
}

impl From<ImPoint> for Point {
    fn from(point: ImPoint) -> Self {
        Point::new(point.xy_coords[0], point.xy_coords[1])
    }
}

impl From<ImSize> for Size {
    fn from(size: ImSize) -> Self {
        Size::new(size.xy_dims[0], size.xy_dims[1])
    }
}

/// Factory for a fiber analyzer. Ownership passes to the caller.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "C" fn CreateFiberAnalyzer() -> *mut AnalyzerHandle {
    Box::into_raw(Box::new(AnalyzerHandle::new(create_fiber_analyzer())))
}

/// Destroy (if still initialized) and free an analyzer. Null is a no-op.
///
/// # Safety
/// `handle` must be null or a pointer returned by a factory in this library
/// that has not been released yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_release(handle: *mut AnalyzerHandle) -> AnalyzerStatus {
    if handle.is_null() {
        return AnalyzerStatus::Ok;
    }
    // SAFETY: the caller guarantees the pointer came from Box::into_raw
    let handle = unsafe { Box::from_raw(handle) };
    guarded(AnalyzerStatus::FailedDestruct, || status((*handle).release()))
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_initialize(handle: *mut AnalyzerHandle) -> AnalyzerStatus {
    unsafe { with_analyzer(handle, AnalyzerStatus::FailedInitialize, |analyzer| {
            status(analyzer.initialize())
        }) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_destroy(handle: *mut AnalyzerHandle) -> AnalyzerStatus {
    unsafe { with_analyzer(handle, AnalyzerStatus::FailedDestruct, |analyzer| {
            status(analyzer.destroy())
        }) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory; `path`
/// must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_input_path(
    handle: *mut AnalyzerHandle,
    path: *const c_char,
) -> AnalyzerStatus {
    let path = unsafe { path_from_c(path) };
    unsafe {
        with_analyzer(handle, AnalyzerStatus::BadInput, |analyzer| {
            let result = match path {
                Some(path) => analyzer.set_input_path(path),
                None => Err(AnalyzerError::BadInput {
                    path: PathBuf::new(),
                    reason: "path is null or not UTF-8".to_string(),
                }),
            };
            status(result)
        })
    }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory; `path`
/// must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_output_path(
    handle: *mut AnalyzerHandle,
    path: *const c_char,
) -> AnalyzerStatus {
    let path = unsafe { path_from_c(path) };
    unsafe {
        with_analyzer(handle, AnalyzerStatus::BadOutput, |analyzer| {
            let result = match path {
                Some(path) => analyzer.set_output_path(path),
                None => Err(AnalyzerError::BadOutput {
                    path: PathBuf::new(),
                    reason: "path is null or not UTF-8".to_string(),
                }),
            };
            status(result)
        })
    }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_i16(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    value: i16,
) -> AnalyzerStatus {
    unsafe { set_parameter_raw(handle, kind, Some(ParameterValue::Short(value))) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_i32(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    value: i32,
) -> AnalyzerStatus {
    unsafe { set_parameter_raw(handle, kind, Some(ParameterValue::Int(value))) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_f32(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    value: f32,
) -> AnalyzerStatus {
    unsafe { set_parameter_raw(handle, kind, Some(ParameterValue::Float(value))) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_f64(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    value: f64,
) -> AnalyzerStatus {
    unsafe { set_parameter_raw(handle, kind, Some(ParameterValue::Double(value))) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory; `values`
/// must point to `len` readable elements unless `len` is zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_i16_array(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    values: *const i16,
    len: usize,
) -> AnalyzerStatus {
    let value = unsafe { slice_from_c(values, len) }.map(ParameterValue::from);
    unsafe { set_parameter_raw(handle, kind, value) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory; `values`
/// must point to `len` readable elements unless `len` is zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_i32_array(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    values: *const i32,
    len: usize,
) -> AnalyzerStatus {
    let value = unsafe { slice_from_c(values, len) }.map(ParameterValue::from);
    unsafe { set_parameter_raw(handle, kind, value) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory; `values`
/// must point to `len` readable elements unless `len` is zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_f32_array(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    values: *const f32,
    len: usize,
) -> AnalyzerStatus {
    let value = unsafe { slice_from_c(values, len) }.map(ParameterValue::from);
    unsafe { set_parameter_raw(handle, kind, value) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory; `values`
/// must point to `len` readable elements unless `len` is zero.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_f64_array(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    values: *const f64,
    len: usize,
) -> AnalyzerStatus {
    let value = unsafe { slice_from_c(values, len) }.map(ParameterValue::from);
    unsafe { set_parameter_raw(handle, kind, value) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_point(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    point: ImPoint,
) -> AnalyzerStatus {
    unsafe { set_parameter_raw(handle, kind, Some(ParameterValue::Point(point.into()))) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_size(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    size: ImSize,
) -> AnalyzerStatus {
    unsafe { set_parameter_raw(handle, kind, Some(ParameterValue::Size(size.into()))) }
}

/// # Safety
/// `handle` must be null or a live pointer returned by a factory.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn analyzer_set_parameter_roi(
    handle: *mut AnalyzerHandle,
    kind: c_int,
    point: ImPoint,
    size: ImSize,
) -> AnalyzerStatus {
    let value = ParameterValue::PointAndSize(point.into(), size.into());
    unsafe { set_parameter_raw(handle, kind, Some(value)) }
}

fn status(result: Result<()>) -> AnalyzerStatus {
    AnalyzerStatus::from(&result)
}

/// Run `f`, reporting a panic as `on_panic`
fn guarded<F>(on_panic: AnalyzerStatus, f: F) -> AnalyzerStatus
where
    F: FnOnce() -> AnalyzerStatus,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(status = %on_panic, "analyzer panicked at the C boundary");
        on_panic
    })
}

unsafe fn with_analyzer<F>(
    handle: *mut AnalyzerHandle,
    on_panic: AnalyzerStatus,
    f: F,
) -> AnalyzerStatus
where
    F: FnOnce(&mut dyn Analyzer) -> AnalyzerStatus,
{
    // SAFETY: the caller guarantees the pointer is null or live and unaliased
    let Some(handle) = (unsafe { handle.as_mut() }) else {
        warn!("null analyzer handle");
        return AnalyzerStatus::FailedInitialize;
    };
    guarded(on_panic, || f(&mut **handle))
}

unsafe fn set_parameter_raw(
    handle: *mut AnalyzerHandle,
    raw_kind: c_int,
    value: Option<ParameterValue>,
) -> AnalyzerStatus {
    unsafe {
        with_analyzer(handle, AnalyzerStatus::BadParameterValue, |analyzer| {
            if let Err(e) = analyzer.state().ensure_ready() {
                return e.status();
            }
            let Some(kind) = AnalyzerParameter::from_repr(raw_kind) else {
                warn!(raw_kind, "unknown parameter kind");
                return AnalyzerStatus::BadParameterType;
            };
            let Some(value) = value else {
                warn!(%kind, "null parameter array");
                return AnalyzerStatus::BadParameterValue;
            };
            status(analyzer.set_parameter(kind, value))
        })
    }
}

unsafe fn path_from_c<'a>(ptr: *const c_char) -> Option<&'a Path> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: the caller guarantees a NUL-terminated string
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str().ok().map(Path::new)
}

unsafe fn slice_from_c<'a, T>(ptr: *const T, len: usize) -> Option<&'a [T]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    // SAFETY: the caller guarantees `len` readable elements
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}
