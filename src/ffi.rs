//! FFI bindings for Geostress
//!
//! This module provides C-compatible functions for calling the engine from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `geostress_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::StressConfig;
use crate::pipeline::{assess_json, StressProcessor};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read an optional C string argument; NULL means absent, invalid UTF-8 is an error
unsafe fn optional_cstr(ptr: *const c_char, name: &str) -> Result<Option<String>, String> {
    if ptr.is_null() {
        return Ok(None);
    }
    cstr_to_string(ptr)
        .map(Some)
        .ok_or_else(|| format!("Invalid {name} string (not UTF-8)"))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Assess a GNSS series and return the encoded assessment payload.
///
/// # Safety
/// - `series_json` must be a valid null-terminated C string.
/// - `seismicity_json` must be a valid null-terminated C string or NULL when
///   no seismicity score is available.
/// - Returns a newly allocated string that must be freed with `geostress_free_string`.
/// - Returns NULL on error; call `geostress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn geostress_assess(
    series_json: *const c_char,
    seismicity_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let series = match cstr_to_string(series_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid series JSON string pointer");
            return ptr::null_mut();
        }
    };

    let seismicity = match optional_cstr(seismicity_json, "seismicity JSON") {
        Ok(s) => s,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match assess_json(&series, seismicity.as_deref()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Configured Engine API
// ============================================================================

/// Opaque handle to a configured StressProcessor
pub struct GeostressEngineHandle {
    processor: StressProcessor,
}

/// Create an engine from a TOML configuration, or the defaults when NULL.
///
/// # Safety
/// - `config_toml` must be a valid null-terminated C string or NULL.
/// - Returns a pointer that must be freed with `geostress_engine_free`.
/// - Returns NULL on error; call `geostress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn geostress_engine_new(
    config_toml: *const c_char,
) -> *mut GeostressEngineHandle {
    clear_last_error();

    let config = match optional_cstr(config_toml, "config TOML") {
        Ok(Some(toml)) => match StressConfig::from_toml_str(&toml) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
        Ok(None) => StressConfig::default(),
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    let handle = Box::new(GeostressEngineHandle {
        processor: StressProcessor::new(config),
    });
    Box::into_raw(handle)
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `geostress_engine_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn geostress_engine_free(engine: *mut GeostressEngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Assess a GNSS series with a configured engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `geostress_engine_new`.
/// - `series_json` must be a valid null-terminated C string.
/// - `seismicity_json` must be a valid null-terminated C string or NULL.
/// - Returns a newly allocated string that must be freed with `geostress_free_string`.
/// - Returns NULL on error; call `geostress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn geostress_engine_assess(
    engine: *const GeostressEngineHandle,
    series_json: *const c_char,
    seismicity_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }

    let handle = &*engine;

    let series = match cstr_to_string(series_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid series JSON string pointer");
            return ptr::null_mut();
        }
    };

    let seismicity = match optional_cstr(seismicity_json, "seismicity JSON") {
        Ok(s) => s,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    match handle.processor.assess_json(&series, seismicity.as_deref()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Geostress functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Geostress function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn geostress_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Geostress function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn geostress_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Geostress library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn geostress_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_series_json() -> CString {
        CString::new(
            r#"{
                "station_id": "IISC",
                "latitude": 13.02,
                "longitude": 77.57,
                "samples": [
                    {"date": "2024-01-01", "north_mm": 0.0, "east_mm": 0.0},
                    {"date": "2024-01-02", "north_mm": 0.3, "east_mm": 0.1},
                    {"date": "2024-01-03", "north_mm": 0.7, "east_mm": 0.1},
                    {"date": "2024-01-04", "north_mm": 1.0, "east_mm": 0.2},
                    {"date": "2024-01-05", "north_mm": 1.4, "east_mm": 0.3}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_assess_without_seismicity() {
        let series = sample_series_json();

        unsafe {
            let result = geostress_assess(series.as_ptr(), ptr::null());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            let value: serde_json::Value = serde_json::from_str(result_str).unwrap();
            assert_eq!(value["assessment"]["station_id"], "IISC");
            assert_eq!(value["assessment"]["provenance"], "geodetic_only");

            geostress_free_string(result);
        }
    }

    #[test]
    fn test_ffi_engine_lifecycle() {
        let config = CString::new("station_radius_km = 150.0\nregion_rules = []\n").unwrap();
        let series = sample_series_json();
        let seismicity =
            CString::new(r#"{"score": 72.0, "label": "High", "earthquake_count": 3}"#).unwrap();

        unsafe {
            let engine = geostress_engine_new(config.as_ptr());
            assert!(!engine.is_null());

            let result = geostress_engine_assess(engine, series.as_ptr(), seismicity.as_ptr());
            assert!(!result.is_null());

            let value: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(value["assessment"]["overall"]["level"], "High");
            // Region table was emptied, so no IS 1893 advisory for Bengaluru
            let recs = value["assessment"]["recommendations"].as_array().unwrap();
            assert!(recs.iter().all(|r| !r.as_str().unwrap().contains("IS 1893")));

            geostress_free_string(result);
            geostress_engine_free(engine);
        }
    }

    #[test]
    fn test_ffi_default_engine() {
        unsafe {
            let engine = geostress_engine_new(ptr::null());
            assert!(!engine.is_null());
            geostress_engine_free(engine);
        }
    }

    #[test]
    fn test_ffi_bad_config() {
        let config = CString::new("station_radius_km = -1.0").unwrap();
        unsafe {
            let engine = geostress_engine_new(config.as_ptr());
            assert!(engine.is_null());
            assert!(!geostress_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid_json = CString::new("not json").unwrap();
            let result = geostress_assess(invalid_json.as_ptr(), ptr::null());

            assert!(result.is_null());

            let error = geostress_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(!error_str.is_empty());
        }
    }

    #[test]
    fn test_ffi_null_engine() {
        let series = sample_series_json();
        unsafe {
            let result = geostress_engine_assess(ptr::null(), series.as_ptr(), ptr::null());
            assert!(result.is_null());
            let error_str = CStr::from_ptr(geostress_last_error()).to_str().unwrap();
            assert_eq!(error_str, "Null engine pointer");
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = geostress_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, crate::GEOSTRESS_VERSION);
        }
    }
}
