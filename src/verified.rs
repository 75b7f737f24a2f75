/// A request that has passed every validation rule for its type.
///
/// `Verified<R>` is the only form in which a request reaches a manager. It
/// is produced by [`validate`](crate::validate::validate) and cannot be built
/// any other way from outside the crate: there is no public constructor and
/// no `From<R>` impl.
///
/// # Access
///
/// - [`AsRef::as_ref`]: borrow the request
/// - [`into_inner`](Self::into_inner): take the request, typically to hand
///   it to a backend client
///
/// `Verified<R>` does not implement `Deref` or `Default`.
///
/// # Examples
///
/// ```compile_fail
/// use gateway_core::Verified;
/// use gateway_core::entities::ClusterId;
///
/// let verified = Verified::new(ClusterId::new("org-1", "c1"));
/// ```
///
/// ```
/// use gateway_core::entities::ClusterId;
/// use gateway_core::validate::validate;
///
/// let verified = validate(ClusterId::new("org-1", "c1")).expect("valid");
/// assert_eq!(verified.as_ref().cluster_id, "c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<R> {
    inner: R,
}

impl<R> Verified<R> {
    /// Wraps a request without checking it.
    ///
    /// Callers must have run the request's rules first. Outside tests the
    /// only caller is [`validate`](crate::validate::validate).
    pub(crate) fn new_unchecked(request: R) -> Self {
        Self { inner: request }
    }

    /// Consumes the wrapper and returns the request.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> AsRef<R> for Verified<R> {
    fn as_ref(&self) -> &R {
        &self.inner
    }
}
