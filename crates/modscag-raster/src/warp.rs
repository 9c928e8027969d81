//! Calls into the GDAL warper that the safe bindings do not expose.
//!
//! Only two entry points are needed: the suggested output grid for a
//! reprojection (`GDALSuggestedWarpOutput`) and the warp itself
//! (`GDALReprojectImage`). Every raw handle is created and destroyed within
//! a single function.

use crate::{RasterError, Result};
use gdal::Dataset;
use gdal_sys::{
    CPLErr, CPLGetLastErrorMsg, CPLMalloc, CSLSetNameValue, GDALCreateGenImgProjTransformer,
    GDALCreateWarpOptions, GDALDestroyGenImgProjTransformer, GDALDestroyWarpOptions,
    GDALGenImgProjTransform, GDALReprojectImage, GDALResampleAlg, GDALSuggestedWarpOutput,
};
use std::ffi::{CStr, CString};
use std::os::raw::c_int;
use std::ptr;

/// Destination grid proposed by GDAL for a reprojection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpGrid {
    /// Affine geotransform in the destination CRS.
    pub geo_transform: [f64; 6],
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// Last error message recorded by GDAL on this thread.
fn last_error(stage: &'static str) -> RasterError {
    // SAFETY: CPLGetLastErrorMsg never returns null; the string is owned by GDAL.
    let message = unsafe { CStr::from_ptr(CPLGetLastErrorMsg()) }
        .to_string_lossy()
        .into_owned();
    RasterError::WarpFailed { stage, message }
}

fn c_string(stage: &'static str, value: &str) -> Result<CString> {
    CString::new(value).map_err(|e| RasterError::WarpFailed {
        stage,
        message: e.to_string(),
    })
}

/// Compute the grid covering `src` once reprojected into `dst_wkt`.
///
/// Mirrors the resolution-preserving heuristic of `gdalwarp`: the output
/// keeps roughly the same number of pixels along the diagonal.
pub fn suggested_warp_output(src: &Dataset, dst_wkt: &str) -> Result<WarpGrid> {
    let dst_wkt = c_string("suggested output", dst_wkt)?;
    let mut geo_transform = [0.0f64; 6];
    let mut pixels: c_int = 0;
    let mut lines: c_int = 0;

    // SAFETY: the source handle outlives this call, the transformer is
    // destroyed before returning, and the out-pointers reference locals.
    unsafe {
        let transformer = GDALCreateGenImgProjTransformer(
            src.c_dataset(),
            ptr::null(),
            ptr::null_mut(),
            dst_wkt.as_ptr(),
            0,
            0.0,
            0,
        );
        if transformer.is_null() {
            return Err(last_error("transformer setup"));
        }

        let err = GDALSuggestedWarpOutput(
            src.c_dataset(),
            Some(GDALGenImgProjTransform),
            transformer,
            geo_transform.as_mut_ptr(),
            &mut pixels,
            &mut lines,
        );
        GDALDestroyGenImgProjTransformer(transformer);

        if err != CPLErr::CE_None {
            return Err(last_error("suggested output"));
        }
    }

    if pixels <= 0 || lines <= 0 {
        return Err(RasterError::WarpFailed {
            stage: "suggested output",
            message: format!("empty destination grid {}x{}", pixels, lines),
        });
    }

    Ok(WarpGrid {
        geo_transform,
        width: pixels as usize,
        height: lines as usize,
    })
}

/// Resample one source band into band 1 of `dst` with nearest-neighbour.
///
/// Both datasets must carry their CRS and geotransform already. `threads`
/// sets the warper's worker count.
pub fn reproject_band(src: &Dataset, dst: &Dataset, src_band: usize, threads: usize) -> Result<()> {
    let thread_count = c_string("warp options", &threads.to_string())?;
    let src_band = c_int::try_from(src_band).map_err(|e| RasterError::WarpFailed {
        stage: "warp options",
        message: e.to_string(),
    })?;

    // SAFETY: the warp options are allocated by GDAL and released with
    // GDALDestroyWarpOptions, which also frees the band arrays and the
    // option list. GDALReprojectImage clones the options it is given.
    unsafe {
        let options = GDALCreateWarpOptions();
        (*options).nBandCount = 1;
        (*options).panSrcBands = CPLMalloc(std::mem::size_of::<c_int>()) as *mut c_int;
        (*options).panDstBands = CPLMalloc(std::mem::size_of::<c_int>()) as *mut c_int;
        *(*options).panSrcBands = src_band;
        *(*options).panDstBands = 1;
        (*options).papszWarpOptions = CSLSetNameValue(
            (*options).papszWarpOptions,
            c"NUM_THREADS".as_ptr(),
            thread_count.as_ptr(),
        );
        (*options).papszWarpOptions = CSLSetNameValue(
            (*options).papszWarpOptions,
            c"INIT_DEST".as_ptr(),
            c"NO_DATA".as_ptr(),
        );

        let err = GDALReprojectImage(
            src.c_dataset(),
            ptr::null(),
            dst.c_dataset(),
            ptr::null(),
            GDALResampleAlg::GRA_NearestNeighbour,
            0.0,
            0.0,
            None,
            ptr::null_mut(),
            options,
        );
        GDALDestroyWarpOptions(options);

        if err != CPLErr::CE_None {
            return Err(last_error("reproject"));
        }
    }

    Ok(())
}
