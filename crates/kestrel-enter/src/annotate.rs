//! Deferred annotation attribution.
//!
//! Header and package annotations are queued while completion is running and
//! validated once the outermost completion returns, when every class they can
//! name has at least been entered.

use crate::env::EnvId;
use crate::error::EnterError;
use crate::session::CompilationSession;
use kestrel_common::DiagnosticKind;
use kestrel_symbols::{Flags, SymbolId};
use kestrel_tree::AnnotationExpr;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Annotations of one class header or package clause.
#[derive(Clone, Debug)]
pub struct PendingAnnotations {
    /// Class or package the annotations apply to.
    pub target: SymbolId,
    pub env: EnvId,
    pub annotations: Vec<AnnotationExpr>,
}

#[derive(Debug, Default)]
pub struct AnnotateQueue {
    blocked: u32,
    queue: VecDeque<PendingAnnotations>,
}

impl AnnotateQueue {
    pub fn enter_start(&mut self) {
        self.blocked += 1;
    }

    pub fn enter_done(&mut self) {
        self.blocked = self.blocked.saturating_sub(1);
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked > 0
    }

    pub fn push(&mut self, pending: PendingAnnotations) {
        if !pending.annotations.is_empty() {
            self.queue.push_back(pending);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn pop(&mut self) -> Option<PendingAnnotations> {
        self.queue.pop_front()
    }
}

impl CompilationSession {
    /// Validate every queued annotation unless the queue is blocked.
    pub(crate) fn flush_annotations(&mut self) {
        if self.annotate.is_blocked() || self.annotate.is_empty() {
            return;
        }
        debug!(pending = self.annotate.len(), "flushing annotations");
        // Attribution below may complete classes; keep nested completions
        // from flushing recursively.
        self.annotate.enter_start();
        while let Some(pending) = self.annotate.pop() {
            for annotation in &pending.annotations {
                if let Err(err) = self.attribute_annotation(&pending, annotation) {
                    self.report_enter_error(pending.env, annotation.pos, err);
                }
            }
        }
        self.annotate.enter_done();
    }

    fn attribute_annotation(
        &mut self,
        pending: &PendingAnnotations,
        annotation: &AnnotationExpr,
    ) -> Result<(), EnterError> {
        let Some(ty) = self.attrib_type(pending.env, &annotation.ty, true)? else {
            return Ok(());
        };
        if ty.is_error() {
            return Ok(());
        }
        let Some(sym) = ty.class_sym() else {
            return Ok(());
        };
        if !self.symtab.flags(sym).contains(Flags::ANNOTATION) {
            let name = self.symtab.full_name(sym).to_string();
            self.report_at_env(
                pending.env,
                annotation.pos,
                DiagnosticKind::NotAnAnnotationType,
                vec![name],
            );
            return Ok(());
        }
        trace!(target = ?pending.target, annotation = ?sym, "annotation recorded");
        if let Some(class) = self.symtab.class_mut(pending.target) {
            if !class.annotations.contains(&sym) {
                class.annotations.push(sym);
            }
        } else {
            let recorded = self.package_annotations.entry(pending.target).or_default();
            if !recorded.contains(&sym) {
                recorded.push(sym);
            }
        }
        Ok(())
    }

    /// Validated annotation types of a package clause.
    #[must_use]
    pub fn package_annotations(&self, package: SymbolId) -> &[SymbolId] {
        self.package_annotations
            .get(&package)
            .map_or(&[], Vec::as_slice)
    }
}
