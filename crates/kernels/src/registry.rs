//! Kernel registry for lookup and discovery.

use crate::daxpy::{DaxpyKernel, DynDaxpyKernel, ReferenceDaxpy, SimdDaxpy};
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct KernelRegistry {
    daxpy_kernels: Vec<DynDaxpyKernel>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self {
            daxpy_kernels: Vec::new(),
        }
    }

    pub fn with_default_daxpy_kernels() -> Self {
        let mut registry = Self::new();
        registry.register_daxpy_kernel(ReferenceDaxpy::new());
        registry.register_daxpy_kernel(SimdDaxpy::new());
        registry
    }

    /// Registers `kernel`, replacing any kernel already registered under
    /// the same name.
    pub fn register_daxpy_kernel<K>(&mut self, kernel: K)
    where
        K: DaxpyKernel + 'static,
    {
        self.daxpy_kernels.retain(|k| k.name() != kernel.name());
        self.daxpy_kernels.push(Arc::new(kernel));
    }

    pub fn daxpy_kernels(&self) -> &[DynDaxpyKernel] {
        &self.daxpy_kernels
    }

    pub fn find_daxpy_kernel(&self, name: &str) -> Option<DynDaxpyKernel> {
        self.daxpy_kernels
            .iter()
            .find(|kernel| kernel.name() == name)
            .map(Arc::clone)
    }
}
