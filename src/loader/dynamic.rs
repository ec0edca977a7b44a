//! Native shared-library backend. Each call opens a fresh `Library`
//! handle immediately before use and drops it immediately after,
//! regardless of outcome — the isolation guarantee this engine actually
//! makes (see the loader module docs for the `dlopen` refcounting
//! caveat on plugins with internal static state).

use std::path::Path;

use libloading::{Library, Symbol};

use super::{BackendOutcome, PluginBackend};

type EntryFn = unsafe extern "C" fn(
    meta_ptr: *const u8,
    meta_len: usize,
    input_ptr: *const u8,
    input_len: usize,
    settings_ptr: *const u8,
    settings_len: usize,
    out_len: *mut usize,
    err_len: *mut usize,
) -> *mut u8;

type LastErrorFn = unsafe extern "C" fn(buf: *mut u8, cap: usize) -> usize;
type FreeFn = unsafe extern "C" fn(ptr: *mut u8, len: usize);

pub struct DynamicLibraryBackend;

impl Default for DynamicLibraryBackend {
    fn default() -> Self {
        Self
    }
}

impl PluginBackend for DynamicLibraryBackend {
    fn invoke(
        &self,
        path: &Path,
        entry_symbol: &str,
        meta: &[u8],
        input: &[u8],
        settings: &[u8],
    ) -> BackendOutcome {
        // SAFETY: the artifact is untrusted code; loading and calling into
        // it is inherently unsafe. The contract it must uphold (the three
        // exported symbols and their signatures) is documented above.
        let library = match unsafe { Library::new(path) } {
            Ok(library) => library,
            Err(e) => return BackendOutcome::Exception(e.to_string()),
        };

        let outcome = unsafe { invoke_entry(&library, entry_symbol, meta, input, settings) };
        drop(library);
        outcome
    }
}

unsafe fn invoke_entry(
    library: &Library,
    entry_symbol: &str,
    meta: &[u8],
    input: &[u8],
    settings: &[u8],
) -> BackendOutcome {
    let entry: Symbol<EntryFn> = match library.get(entry_symbol.as_bytes()) {
        Ok(symbol) => symbol,
        Err(e) => return BackendOutcome::Exception(e.to_string()),
    };

    let mut out_len: usize = 0;
    let mut err_len: usize = 0;
    let ptr = entry(
        meta.as_ptr(),
        meta.len(),
        input.as_ptr(),
        input.len(),
        settings.as_ptr(),
        settings.len(),
        &mut out_len,
        &mut err_len,
    );

    if ptr.is_null() {
        return read_last_error(library, entry_symbol, err_len);
    }

    let bytes = std::slice::from_raw_parts(ptr, out_len).to_vec();
    let free_name = format!("{entry_symbol}_free");
    if let Ok(free_fn) = library.get::<FreeFn>(free_name.as_bytes()) {
        free_fn(ptr, out_len);
    }
    BackendOutcome::Ok(bytes)
}

unsafe fn read_last_error(library: &Library, entry_symbol: &str, err_len: usize) -> BackendOutcome {
    if err_len == 0 {
        return BackendOutcome::NullReturn;
    }
    let last_error_name = format!("{entry_symbol}_last_error");
    let last_error: Symbol<LastErrorFn> = match library.get(last_error_name.as_bytes()) {
        Ok(symbol) => symbol,
        Err(e) => return BackendOutcome::Exception(e.to_string()),
    };
    let mut buf = vec![0u8; err_len];
    let written = last_error(buf.as_mut_ptr(), buf.len()).min(err_len);
    buf.truncate(written);
    BackendOutcome::Exception(String::from_utf8_lossy(&buf).into_owned())
}
